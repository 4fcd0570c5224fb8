//! Generated `load.el`, which puts installed packages on the editor's paths

use crate::package::PackageKind;
use crate::resolver::InstallSet;
use emenv_syntax::Node;
use std::path::Path;

/// File name inside the state directory
pub const LOAD_FILE_NAME: &str = "load.el";

/// Render the load file for `set`, with package directories under `package_dir`
pub fn render_load_file(set: &InstallSet, package_dir: &Path) -> String {
    let mut out = String::from(";; autoload-file for Emenv\n");

    for def in set.winners() {
        match def.kind {
            PackageKind::Provided => {
                out.push_str(&format!(";; {} is provided\n", def.name));
            }
            kind if kind.is_fetchable() => {
                let dir = package_dir.join(def.dir_name());
                let dir = Node::string(dir.to_string_lossy());
                if kind == PackageKind::Theme {
                    out.push_str(&format!(
                        "(add-to-list 'custom-theme-load-path {})\n",
                        dir
                    ));
                }
                out.push_str(&format!("(add-to-list 'load-path {})\n", dir));
            }
            _ => {}
        }
    }
    out
}
