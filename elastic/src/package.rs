//! Package of generated Verilog modules.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use linked_hash_map::LinkedHashMap;
use log::info;
use thiserror::Error;

use crate::vir;

#[allow(missing_docs)]
#[allow(variant_size_differences)]
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("file system error: {error:?}")]
    Fs { error: io::Error },

    #[error("module `{name}` is already in the package")]
    DuplicateModule { name: String },
}

/// Package.
///
/// Modules are written in the order they were added.
#[derive(Debug, Default)]
pub struct Package {
    modules: LinkedHashMap<String, vir::Module>,
}

impl Package {
    /// Adds the given module to package.
    pub fn add(&mut self, module: vir::Module) -> Result<(), PackageError> {
        if self.modules.contains_key(&module.name) {
            return Err(PackageError::DuplicateModule { name: module.name });
        }
        let _ = self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    /// Module names, in insertion order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> { self.modules.keys().map(String::as_str) }

    /// Returns the module with the given name.
    pub fn get(&self, name: &str) -> Option<&vir::Module> { self.modules.get(name) }

    /// Generates Verilog code at the given directory path, one `<name>.v` file per module.
    pub fn gen_vir<P: AsRef<Path>>(&self, path_dir: P) -> Result<(), PackageError> {
        fs::create_dir_all(path_dir.as_ref()).map_err(|error| PackageError::Fs { error })?;

        for (name, module) in self.modules.iter() {
            let path = path_dir.as_ref().join(format!("{}.v", name));
            let mut file = File::create(&path).map_err(|error| PackageError::Fs { error })?;
            writeln!(file, "{}", module).map_err(|error| PackageError::Fs { error })?;
            info!("wrote {}", path.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vir::*;

    fn module(name: &str) -> vir::Module {
        vir::Module {
            name: name.to_string(),
            params: vec![],
            port_decls: vec![PortDeclaration::input(Width::Const(1), "a"), PortDeclaration::output(Width::Const(1), "b")],
            module_items: vec![ModuleItem::ContinuousAssigns(vec![ContinuousAssign::new(
                Expression::ident("b"),
                Expression::ident("a"),
            )])],
        }
    }

    #[test]
    fn duplicate_module_is_rejected() {
        let mut package = Package::default();
        package.add(module("wire")).unwrap();
        assert!(matches!(package.add(module("wire")), Err(PackageError::DuplicateModule { name }) if name == "wire"));
    }

    #[test]
    fn gen_vir_writes_one_file_per_module() {
        let dir = tempfile::tempdir().unwrap();
        let mut package = Package::default();
        package.add(module("first")).unwrap();
        package.add(module("second")).unwrap();
        assert_eq!(package.module_names().collect::<Vec<_>>(), ["first", "second"]);
        assert_eq!(package.get("second").map(|module| module.name.as_str()), Some("second"));
        assert!(package.get("third").is_none());

        package.gen_vir(dir.path().join("build")).unwrap();

        let first = fs::read_to_string(dir.path().join("build/first.v")).unwrap();
        assert!(first.contains("module first\n(\n    input wire a,\n    output wire b\n);"));
        assert!(first.contains("assign b = a;"));
        assert!(dir.path().join("build/second.v").exists());
    }
}
