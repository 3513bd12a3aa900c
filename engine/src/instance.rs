//! One live sandboxed execution context bound to a [`Module`] (`spec.md` §4.C).

use crate::arena::ARENA_SIZE;
use crate::error::InstanceError;
use crate::module::Module;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};
use std::thread::ThreadId;
use wasmtime::{Func, FuncType, Memory, Store, Table, TypedFunc, Val, ValType};
use wasmtime_wasi::{WasiCtx, WasiCtxBuilder, WasiView};
use wclap_common::abi::SandboxWord;

/// The four fixed guest directory grants an [`Instance`] may preopen, per `spec.md` §4.C.3.
#[derive(Default, Clone)]
pub struct WasiDirs {
    /// Mapped read-only to `/plugin/`.
    pub plugin_dir: Option<PathBuf>,
    /// Mapped read-write to `/presets/`.
    pub preset_dir: Option<PathBuf>,
    /// Mapped read-write to `/cache/`.
    pub cache_dir: Option<PathBuf>,
    /// Mapped read-write to `/var/`.
    pub var_dir: Option<PathBuf>,
    /// If true, a missing directory is a [`InstanceError::Link`] failure rather than being
    /// silently skipped.
    pub must_link_dirs: bool,
}

struct StoreData {
    wasi: WasiCtx,
    table: wasmtime_wasi::ResourceTable,
}

impl WasiView for StoreData {
    fn table(&mut self) -> &mut wasmtime_wasi::ResourceTable {
        &mut self.table
    }

    fn ctx(&mut self) -> &mut WasiCtx {
        &mut self.wasi
    }
}

/// A recursive mutex: the thread already holding the lock can re-acquire it (needed because a
/// sandbox call may call back into the host, which may call back into the sandbox on the same
/// logical thread, per `spec.md` §5).
struct ReentrantLock {
    owner: Mutex<Option<(ThreadId, usize)>>,
    available: Condvar,
}

impl ReentrantLock {
    fn new() -> Self {
        Self {
            owner: Mutex::new(None),
            available: Condvar::new(),
        }
    }

    fn acquire(&self) -> ReentrantGuard<'_> {
        let this = std::thread::current().id();
        let mut owner = self.owner.lock().unwrap();
        loop {
            match *owner {
                Some((tid, depth)) if tid == this => {
                    *owner = Some((tid, depth + 1));
                    break;
                }
                None => {
                    *owner = Some((this, 1));
                    break;
                }
                Some(_) => owner = self.available.wait(owner).unwrap(),
            }
        }
        ReentrantGuard { lock: self }
    }

    fn release(&self) {
        let mut owner = self.owner.lock().unwrap();
        match *owner {
            Some((tid, depth)) if depth > 1 => *owner = Some((tid, depth - 1)),
            _ => {
                *owner = None;
                self.available.notify_one();
            }
        }
    }
}

struct ReentrantGuard<'a> {
    lock: &'a ReentrantLock,
}

impl<'a> Drop for ReentrantGuard<'a> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// One live execution context: store, linker, bound exports, and WASI grants. See `spec.md`
/// §4.C for the setup sequence and §5 for the concurrency discipline.
pub struct Instance {
    store: Mutex<Store<StoreData>>,
    lock: ReentrantLock,
    malloc: MallocFn,
    memory: Option<Memory>,
    table: Table,
    is_sixty_four_bit: bool,
    epoch_budget: Option<u64>,
    poisoned: Mutex<Option<InstanceError>>,
    entry_ptr: SandboxWord,
}

/// The instance's `malloc` export, typed per the sandbox's discovered pointer width.
enum MallocFn {
    Narrow(TypedFunc<u32, u32>),
    Wide(TypedFunc<u64, u64>),
}

impl Instance {
    /// Runs the full setup sequence from `spec.md` §4.C. Any failure along the way is recorded
    /// and returned; the instance is not constructed on failure.
    pub fn new(module: &Module, dirs: WasiDirs) -> Result<Self, InstanceError> {
        let engine = module.engine();
        let mut linker = wasmtime::Linker::new(engine.wasmtime());
        wasmtime_wasi::add_to_linker_sync(&mut linker, |s: &mut StoreData| s)
            .map_err(|e| InstanceError::Link(e.to_string()))?;

        let mut builder = WasiCtxBuilder::new();
        builder.inherit_stdout().inherit_stderr();
        for var in ["TERM", "LANG"] {
            if let Ok(value) = std::env::var(var) {
                builder.env(var, value);
            }
        }

        Self::preopen(&mut builder, "/plugin/", dirs.plugin_dir.as_deref(), true, dirs.must_link_dirs)?;
        Self::preopen(&mut builder, "/presets/", dirs.preset_dir.as_deref(), false, dirs.must_link_dirs)?;
        Self::preopen(&mut builder, "/cache/", dirs.cache_dir.as_deref(), false, dirs.must_link_dirs)?;
        Self::preopen(&mut builder, "/var/", dirs.var_dir.as_deref(), false, dirs.must_link_dirs)?;

        let store_data = StoreData {
            wasi: builder.build(),
            table: wasmtime_wasi::ResourceTable::new(),
        };
        let mut store = Store::new(engine.wasmtime(), store_data);

        let epoch_budget = engine.epoch_budget_ticks();
        if let Some(budget) = epoch_budget {
            store.set_epoch_deadline(budget);
        }

        let instantiate = linker
            .instantiate(&mut store, module.wasmtime())
            .map_err(|e| InstanceError::Link(e.to_string()));
        let wasmtime_instance = instantiate?;

        let is_sixty_four_bit = module.shape().is_sixty_four_bit;
        let malloc = if is_sixty_four_bit {
            MallocFn::Wide(
                wasmtime_instance
                    .get_typed_func::<u64, u64>(&mut store, "malloc")
                    .map_err(|e| InstanceError::Link(e.to_string()))?,
            )
        } else {
            MallocFn::Narrow(
                wasmtime_instance
                    .get_typed_func::<u32, u32>(&mut store, "malloc")
                    .map_err(|e| InstanceError::Link(e.to_string()))?,
            )
        };

        // Only the non-shared-memory path binds its own memory export; a shared-memory instance
        // gets its memory from the import the bridge supplies when defining the linker, which is
        // out of scope for this crate (see DESIGN.md).
        let memory = wasmtime_instance.get_memory(&mut store, "memory");

        let table = wasmtime_instance
            .get_table(&mut store, module.table_export_name())
            .ok_or_else(|| InstanceError::Link("function table export vanished after instantiation".into()))?;

        let entry_global = wasmtime_instance
            .get_global(&mut store, "clap_entry")
            .ok_or_else(|| InstanceError::Link("clap_entry export vanished after instantiation".into()))?;
        let entry_ptr = match entry_global.get(&mut store) {
            Val::I32(v) => SandboxWord::W32(u32::from_ne_bytes(v.to_ne_bytes())),
            Val::I64(v) => SandboxWord::W64(u64::from_ne_bytes(v.to_ne_bytes())),
            _ => return Err(InstanceError::Link("clap_entry is not an integer global".into())),
        };

        let instance = Self {
            store: Mutex::new(store),
            lock: ReentrantLock::new(),
            malloc,
            memory,
            table,
            is_sixty_four_bit,
            epoch_budget,
            poisoned: Mutex::new(None),
            entry_ptr,
        };

        if let Ok(initialize) = wasmtime_instance
            .get_typed_func::<(), ()>(&mut instance.store.lock().unwrap(), "_initialize")
        {
            let mut store = instance.store.lock().unwrap();
            if let Some(budget) = epoch_budget {
                store.set_epoch_deadline(budget);
            }
            initialize
                .call(&mut *store, ())
                .map_err(|e| InstanceError::InitializationFailed(e.to_string()))?;
        }

        Ok(instance)
    }

    fn preopen(
        builder: &mut WasiCtxBuilder,
        guest_path: &str,
        host_path: Option<&std::path::Path>,
        read_only: bool,
        must_link: bool,
    ) -> Result<(), InstanceError> {
        let Some(host_path) = host_path else {
            return if must_link {
                Err(InstanceError::Link(format!(
                    "required directory grant for {guest_path} is missing"
                )))
            } else {
                Ok(())
            };
        };

        let perms = if read_only {
            wasmtime_wasi::DirPerms::READ
        } else {
            wasmtime_wasi::DirPerms::all()
        };
        let file_perms = if read_only {
            wasmtime_wasi::FilePerms::READ
        } else {
            wasmtime_wasi::FilePerms::all()
        };

        builder
            .preopened_dir(host_path, guest_path, perms, file_perms)
            .map_err(|e| InstanceError::Link(format!("failed to preopen {guest_path}: {e}")))?;
        Ok(())
    }

    /// Records the first poisoning error, if none is recorded yet. Later errors are logged but
    /// never overwrite (`spec.md` §7).
    fn poison(&self, error: InstanceError) -> InstanceError {
        let mut slot = self.poisoned.lock().unwrap();
        if slot.is_none() {
            *slot = Some(error.clone());
        } else {
            log::warn!("instance already poisoned; dropping subsequent error: {error}");
        }
        slot.clone().unwrap()
    }

    /// The first preserved error for this instance, if it has been poisoned.
    pub fn get_error(&self) -> Option<InstanceError> {
        self.poisoned.lock().unwrap().clone()
    }

    /// Whether this instance refuses further calls.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.lock().unwrap().is_some()
    }

    /// `malloc(size)`: allocates inside the sandbox, under the instance lock and a fresh
    /// deadline.
    pub fn malloc(&self, size: u64) -> Result<SandboxWord, InstanceError> {
        if let Some(err) = self.get_error() {
            return Err(err);
        }
        let _guard = self.lock.acquire();
        let mut store = self.store.lock().unwrap();
        if let Some(budget) = self.epoch_budget {
            store.set_epoch_deadline(budget);
        }
        let result = match &self.malloc {
            MallocFn::Wide(f) => f.call(&mut *store, size),
            MallocFn::Narrow(f) => f
                .call(&mut *store, size as u32)
                .map(u64::from),
        };
        match result {
            Ok(ptr) => Ok(SandboxWord::from_u64(ptr, self.is_sixty_four_bit)),
            Err(e) => Err(self.poison(Self::classify_trap(&e))),
        }
    }

    /// `malloc`'s the fixed-size arena region used by an [`ArenaPool`](crate::ArenaPool).
    pub fn malloc_arena(&self) -> Result<SandboxWord, InstanceError> {
        self.malloc(ARENA_SIZE)
    }

    fn classify_trap(error: &wasmtime::Error) -> InstanceError {
        if let Some(trap) = error.downcast_ref::<wasmtime::Trap>() {
            if matches!(trap, wasmtime::Trap::Interrupt) {
                return InstanceError::Timeout;
            }
        }
        InstanceError::Trap(error.to_string())
    }

    /// Whether this instance's module addresses memory with 32-bit or 64-bit pointers.
    pub fn is_sixty_four_bit(&self) -> bool {
        self.is_sixty_four_bit
    }

    /// The sandbox address of the `clap_plugin_entry` struct exported via the `clap_entry`
    /// global, read once at setup (`spec.md` §3, "Module").
    pub fn entry_pointer(&self) -> SandboxWord {
        self.entry_ptr
    }

    /// `readMemory(sandboxPointer, length)`: returns a copy of sandbox memory, clipped to the
    /// current memory size rather than trapping on an out-of-bounds request.
    pub fn read_memory(&self, ptr: SandboxWord, len: usize) -> Result<Vec<u8>, InstanceError> {
        if let Some(err) = self.get_error() {
            return Err(err);
        }
        let memory = self
            .memory
            .ok_or_else(|| InstanceError::Link("instance has no bound memory".into()))?;
        let store = self.store.lock().unwrap();
        let data = memory.data(&*store);
        let start = ptr.as_usize().min(data.len());
        let end = start.saturating_add(len).min(data.len());
        Ok(data[start..end].to_vec())
    }

    /// `writeMemory(sandboxPointer, bytes)`: writes into sandbox memory, clipped to the current
    /// memory size.
    pub fn write_memory(&self, ptr: SandboxWord, bytes: &[u8]) -> Result<(), InstanceError> {
        if let Some(err) = self.get_error() {
            return Err(err);
        }
        let memory = self
            .memory
            .ok_or_else(|| InstanceError::Link("instance has no bound memory".into()))?;
        let mut store = self.store.lock().unwrap();
        let data = memory.data_mut(&mut *store);
        let start = ptr.as_usize().min(data.len());
        let end = start.saturating_add(bytes.len()).min(data.len());
        let writable = end - start;
        data[start..end].copy_from_slice(&bytes[..writable]);
        Ok(())
    }

    /// `registerHostFunction`: installs a host trampoline into the function table and returns
    /// its index. Only called during instance setup, so indices stay deterministic and can be
    /// baked into sandbox-side proxy structs (`spec.md` §4.C).
    pub fn register_host_function(&self, trampoline: Func) -> Result<u32, InstanceError> {
        let mut store = self.store.lock().unwrap();
        let index = self.table.size(&mut *store);
        self.table
            .grow(&mut *store, 1, trampoline.into())
            .map_err(|e| InstanceError::Link(format!("failed to grow function table: {e}")))?;
        Ok(index)
    }

    /// Reads the exported linear memory directly off a live `Caller`, bypassing the instance
    /// lock: a trampoline built by [`Self::register_closure`]/[`Self::register_void_closure`]
    /// runs while `call_indexed` already holds `self.store`'s lock, so going through
    /// [`Self::read_memory`] from inside one would deadlock. Returns an empty slice if the
    /// module has no plain memory export (e.g. a shared-memory multithreaded bundle, out of
    /// scope for host-callback routing in this pass; see `DESIGN.md`).
    fn caller_memory(caller: &mut wasmtime::Caller<'_, StoreData>) -> Vec<u8> {
        match caller.get_export("memory") {
            Some(wasmtime::Extern::Memory(mem)) => mem.data(&caller).to_vec(),
            _ => Vec::new(),
        }
    }

    /// Builds and registers a host trampoline of signature `(word...) -> word` purely in terms
    /// of [`SandboxWord`] and a snapshot of linear memory, so callers outside this crate never
    /// need to name a `wasmtime` type. Used by `wclap-ffi` to wire the sandbox-to-host callback
    /// slots of a host proxy (`spec.md` §4.F, "Plugin creation"): the sandbox passes the proxy's
    /// own pointer as the trampoline's argument, so reading the proxy's `host_data` field back
    /// out needs memory access, not just the raw word.
    pub fn register_closure<F>(&self, arity: usize, f: F) -> Result<u32, InstanceError>
    where
        F: Fn(&[u8], &[SandboxWord]) -> SandboxWord + Send + Sync + 'static,
    {
        let is_64 = self.is_sixty_four_bit;
        let val_type = if is_64 { ValType::I64 } else { ValType::I32 };
        let mut store = self.store.lock().unwrap();
        let ty = FuncType::new(store.engine(), vec![val_type; arity], vec![val_type]);
        let func = Func::new(&mut *store, ty, move |mut caller, params, results| {
            let words: Vec<SandboxWord> = params
                .iter()
                .map(|v| match v {
                    Val::I32(v) => SandboxWord::W32(u32::from_ne_bytes(v.to_ne_bytes())),
                    Val::I64(v) => SandboxWord::W64(u64::from_ne_bytes(v.to_ne_bytes())),
                    _ => SandboxWord::null(is_64),
                })
                .collect();
            let mem = Self::caller_memory(&mut caller);
            results[0] = match SandboxWord::from_u64(f(&mem, &words).as_u64(), is_64) {
                SandboxWord::W32(v) => Val::I32(i32::from_ne_bytes(v.to_ne_bytes())),
                SandboxWord::W64(v) => Val::I64(i64::from_ne_bytes(v.to_ne_bytes())),
            };
            Ok(())
        });
        drop(store);
        self.register_host_function(func)
    }

    /// Same as [`Self::register_closure`] but for a signature of `(word...) -> ()`, e.g.
    /// `request_restart`/`request_process`/`request_callback`.
    pub fn register_void_closure<F>(&self, arity: usize, f: F) -> Result<u32, InstanceError>
    where
        F: Fn(&[u8], &[SandboxWord]) + Send + Sync + 'static,
    {
        let is_64 = self.is_sixty_four_bit;
        let val_type = if is_64 { ValType::I64 } else { ValType::I32 };
        let mut store = self.store.lock().unwrap();
        let ty = FuncType::new(store.engine(), vec![val_type; arity], vec![]);
        let func = Func::new(&mut *store, ty, move |mut caller, params, _results| {
            let words: Vec<SandboxWord> = params
                .iter()
                .map(|v| match v {
                    Val::I32(v) => SandboxWord::W32(u32::from_ne_bytes(v.to_ne_bytes())),
                    Val::I64(v) => SandboxWord::W64(u64::from_ne_bytes(v.to_ne_bytes())),
                    _ => SandboxWord::null(is_64),
                })
                .collect();
            let mem = Self::caller_memory(&mut caller);
            f(&mem, &words);
            Ok(())
        });
        drop(store);
        self.register_host_function(func)
    }

    fn word_to_val(&self, word: SandboxWord) -> Val {
        if self.is_sixty_four_bit {
            Val::I64(i64::from_ne_bytes(word.as_u64().to_ne_bytes()))
        } else {
            Val::I32(i32::from_ne_bytes((word.as_u64() as u32).to_ne_bytes()))
        }
    }

    fn val_to_word(&self, val: &Val) -> Result<SandboxWord, InstanceError> {
        match (val, self.is_sixty_four_bit) {
            (Val::I32(v), false) => Ok(SandboxWord::W32(u32::from_ne_bytes(v.to_ne_bytes()))),
            (Val::I64(v), true) => Ok(SandboxWord::W64(u64::from_ne_bytes(v.to_ne_bytes()))),
            _ => Err(InstanceError::Trap("function result width does not match sandbox pointer width".into())),
        }
    }

    /// Calls a sandbox function reached through the function table whose signature is `(word...)
    /// -> word`, e.g. `get_factory`, `get_plugin_descriptor`, `create_plugin` (`spec.md` §4.F).
    pub fn call_table_fn_word(&self, table_index: u32, args: &[SandboxWord]) -> Result<SandboxWord, InstanceError> {
        let args: Vec<Val> = args.iter().map(|w| self.word_to_val(*w)).collect();
        let mut results = [self.word_to_val(SandboxWord::null(self.is_sixty_four_bit))];
        self.call_indexed(table_index, &args, &mut results)?;
        self.val_to_word(&results[0])
    }

    /// Calls a sandbox function whose signature is `(word...) -> bool`, e.g. `init`.
    pub fn call_table_fn_bool(&self, table_index: u32, args: &[SandboxWord]) -> Result<bool, InstanceError> {
        let args: Vec<Val> = args.iter().map(|w| self.word_to_val(*w)).collect();
        let mut results = [Val::I32(0)];
        self.call_indexed(table_index, &args, &mut results)?;
        match results[0] {
            Val::I32(v) => Ok(v != 0),
            _ => Err(InstanceError::Trap("expected a boolean (i32) result".into())),
        }
    }

    /// Calls a sandbox function whose signature is `(word...) -> u32`, e.g. `get_plugin_count`.
    pub fn call_table_fn_u32(&self, table_index: u32, args: &[SandboxWord]) -> Result<u32, InstanceError> {
        let args: Vec<Val> = args.iter().map(|w| self.word_to_val(*w)).collect();
        let mut results = [Val::I32(0)];
        self.call_indexed(table_index, &args, &mut results)?;
        match results[0] {
            Val::I32(v) => Ok(u32::from_ne_bytes(v.to_ne_bytes())),
            _ => Err(InstanceError::Trap("expected a u32 (i32) result".into())),
        }
    }

    /// Calls a sandbox function whose signature is `(word...) -> ()`, e.g. `deinit`.
    pub fn call_table_fn_void(&self, table_index: u32, args: &[SandboxWord]) -> Result<(), InstanceError> {
        let args: Vec<Val> = args.iter().map(|w| self.word_to_val(*w)).collect();
        self.call_indexed(table_index, &args, &mut [])
    }

    /// `call(funcPointer, args...)`: invokes a sandbox function reached through the function
    /// table, under the instance lock and a fresh deadline.
    pub fn call_indexed(&self, table_index: u32, args: &[Val], results: &mut [Val]) -> Result<(), InstanceError> {
        if let Some(err) = self.get_error() {
            return Err(err);
        }
        let _guard = self.lock.acquire();
        let mut store = self.store.lock().unwrap();
        if let Some(budget) = self.epoch_budget {
            store.set_epoch_deadline(budget);
        }
        let func = self
            .table
            .get(&mut *store, table_index)
            .and_then(|v| v.funcref().copied().flatten())
            .ok_or_else(|| InstanceError::Trap(format!("no function at table index {table_index}")))?;
        func.call(&mut *store, args, results)
            .map_err(|e| self.poison(Self::classify_trap(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;

    const MINIMAL_WAT: &str = r#"
        (module
            (memory (export "memory") 1)
            (global (export "clap_entry") i32 (i32.const 0))
            (func (export "malloc") (param i32) (result i32) (local.get 0))
            (table (export "wclap_table") 1 70000 funcref)
        )
    "#;

    #[test]
    fn instance_setup_succeeds_on_minimal_module() {
        let engine = Engine::global_init(None).unwrap();
        let bytes = wat::parse_str(MINIMAL_WAT).unwrap();
        let module = Module::open(engine, &bytes).unwrap();
        let instance = Instance::new(&module, WasiDirs::default()).unwrap();
        assert!(!instance.is_poisoned());
        assert!(instance.malloc(16).is_ok());
    }
}
