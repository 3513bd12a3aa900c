//! Compiling a bundle and discovering its sandbox shape (`spec.md` §4.B).

use crate::engine::Engine;
use crate::error::EngineError;
use std::sync::Arc;
use wasmtime::{ExternType, ValType};

/// Minimum growth headroom a bundle's function table must leave for the bridge to install
/// host-callback trampolines into, per `spec.md` §4.B.
const MIN_TABLE_GROWTH: u64 = 65_536;

/// The shape of a compiled bundle, as determined solely by inspecting its export and import
/// types (`spec.md` §3). Construction never runs any sandbox code.
#[derive(Debug, Clone, Copy)]
pub struct ModuleShape {
    /// Whether the bundle addresses its sandbox memory with 32-bit or 64-bit pointers, as
    /// determined by the value type of the `clap_entry` global export.
    pub is_sixty_four_bit: bool,
    /// Whether the bundle imports a shared memory (multithreaded) rather than exporting its
    /// own private memory.
    pub has_shared_memory: bool,
}

/// A compiled bundle: wasm bytecode plus its discovered [`ModuleShape`].
pub struct Module {
    engine: Arc<Engine>,
    wasmtime_module: wasmtime::Module,
    shape: ModuleShape,
    table_export_name: String,
}

impl Module {
    /// `open(bytes)`: compiles the bundle and inspects its exports/imports to determine shape.
    /// Produces a stable [`EngineError::Configuration`] message on any shape violation.
    pub fn open(engine: Arc<Engine>, bytes: &[u8]) -> Result<Self, EngineError> {
        let wasmtime_module = wasmtime::Module::new(engine.wasmtime(), bytes)
            .map_err(|e| EngineError::Compile(e.to_string()))?;

        let is_sixty_four_bit = Self::entry_width(&wasmtime_module)?;
        let has_shared_memory = Self::memory_shape(&wasmtime_module, is_sixty_four_bit)?;
        Self::check_malloc(&wasmtime_module, is_sixty_four_bit)?;
        let table_export_name = Self::check_function_table(&wasmtime_module)?;

        Ok(Self {
            engine,
            wasmtime_module,
            shape: ModuleShape {
                is_sixty_four_bit,
                has_shared_memory,
            },
            table_export_name,
        })
    }

    fn entry_width(module: &wasmtime::Module) -> Result<bool, EngineError> {
        let entry = module
            .exports()
            .find(|e| e.name() == "clap_entry")
            .ok_or_else(|| EngineError::configuration("missing required export `clap_entry`"))?;

        match entry.ty() {
            ExternType::Global(g) => match g.content() {
                ValType::I32 => Ok(false),
                ValType::I64 => Ok(true),
                _ => Err(EngineError::configuration(
                    "clap_entry must be 32-bit or 64-bit memory address",
                )),
            },
            _ => Err(EngineError::configuration(
                "clap_entry must be 32-bit or 64-bit memory address",
            )),
        }
    }

    fn memory_shape(module: &wasmtime::Module, is_sixty_four_bit: bool) -> Result<bool, EngineError> {
        let exported_memory = module.exports().any(|e| {
            matches!(e.ty(), ExternType::Memory(_)) && e.name() == "memory"
        });

        let shared_import = module.imports().find(|i| {
            matches!(i.ty(), ExternType::Memory(m) if m.is_shared())
        });

        match (exported_memory, shared_import) {
            (true, None) => Ok(false),
            (false, Some(import)) => {
                let ExternType::Memory(memory_type) = import.ty() else {
                    unreachable!("filtered to Memory above")
                };
                if memory_type.is_64() != is_sixty_four_bit {
                    return Err(EngineError::configuration(
                        "shared memory import width does not match clap_entry width",
                    ));
                }
                Ok(true)
            }
            (false, None) => Err(EngineError::configuration(
                "module neither exports memory nor imports non-shared memory",
            )),
            (true, Some(_)) => Err(EngineError::configuration(
                "module both exports memory and imports shared memory",
            )),
        }
    }

    fn check_malloc(module: &wasmtime::Module, is_sixty_four_bit: bool) -> Result<(), EngineError> {
        let expected = if is_sixty_four_bit { ValType::I64 } else { ValType::I32 };

        let malloc = module
            .exports()
            .find(|e| e.name() == "malloc")
            .ok_or_else(|| EngineError::configuration("missing required export `malloc`"))?;

        let ExternType::Func(func) = malloc.ty() else {
            return Err(EngineError::configuration("malloc() function signature mismatch"));
        };

        let params: Vec<_> = func.params().collect();
        let results: Vec<_> = func.results().collect();
        if params != [expected] || results != [expected] {
            return Err(EngineError::configuration("malloc() function signature mismatch"));
        }
        Ok(())
    }

    fn check_function_table(module: &wasmtime::Module) -> Result<String, EngineError> {
        let tables: Vec<_> = module
            .exports()
            .filter_map(|e| match e.ty() {
                ExternType::Table(t) if t.element().is_func() => Some((e.name().to_owned(), t)),
                _ => None,
            })
            .collect();

        let (name, table) = match tables.as_slice() {
            [single] => single,
            [] => {
                return Err(EngineError::configuration(
                    "module exports no growable funcref table",
                ));
            }
            _ => {
                return Err(EngineError::configuration(
                    "module exports more than one funcref table",
                ));
            }
        };

        let max = table
            .maximum()
            .ok_or_else(|| EngineError::configuration("function table has no maximum size"))?;
        if max < table.minimum() + MIN_TABLE_GROWTH {
            return Err(EngineError::configuration(
                "function table does not leave enough headroom for host trampolines",
            ));
        }
        Ok(name.clone())
    }

    pub(crate) fn wasmtime(&self) -> &wasmtime::Module {
        &self.wasmtime_module
    }

    pub(crate) fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// The discovered shape of this bundle.
    pub fn shape(&self) -> ModuleShape {
        self.shape
    }

    pub(crate) fn table_export_name(&self) -> &str {
        &self.table_export_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(wat: &str, deadline: Option<u32>) -> Result<Module, EngineError> {
        let engine = Engine::global_init(deadline).unwrap();
        let bytes = wat::parse_str(wat).unwrap();
        Module::open(engine, &bytes)
    }

    const VALID_WAT: &str = r#"
        (module
            (memory (export "memory") 1)
            (global (export "clap_entry") i32 (i32.const 0))
            (func (export "malloc") (param i32) (result i32) (local.get 0))
            (table (export "wclap_table") 1 70000 funcref)
        )
    "#;

    #[test]
    fn accepts_a_well_shaped_32_bit_module() {
        let module = compile(VALID_WAT, None).unwrap();
        assert!(!module.shape().is_sixty_four_bit);
        assert!(!module.shape().has_shared_memory);
    }

    #[test]
    fn rejects_f32_entry() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (global (export "clap_entry") f32 (f32.const 0))
                (func (export "malloc") (param i32) (result i32) (local.get 0))
                (table (export "wclap_table") 1 70000 funcref)
            )
        "#;
        let err = compile(wat, None).unwrap_err();
        assert!(err.to_string().contains("clap_entry must be 32-bit or 64-bit"));
    }

    #[test]
    fn rejects_missing_table_headroom() {
        let wat = r#"
            (module
                (memory (export "memory") 1)
                (global (export "clap_entry") i32 (i32.const 0))
                (func (export "malloc") (param i32) (result i32) (local.get 0))
                (table (export "wclap_table") 1 2 funcref)
            )
        "#;
        let err = compile(wat, None).unwrap_err();
        assert!(err.to_string().contains("headroom"));
    }
}
