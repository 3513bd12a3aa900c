//! The outer C ABI (`spec.md` §6): `globalInit`/`globalDeinit`/`open`/`openWithDirs`/`close`/
//! `version`/`getFactory`/`lastError`, plus the [`WclapModule`] opaque handle they operate on.
//!
//! This is the only crate a real CLAP host links against. Everything else — compiling the
//! bundle, running it inside wasmtime, marshalling structs across the boundary, routing
//! sandbox-to-host callbacks — lives in [`wclap_engine`], [`wclap_marshal`], and [`wclap_bridge`];
//! this crate's job is just to stitch them together behind the literal CLAP vtables a host
//! expects, and to translate any error into the ABI's null/false/`lastError` idiom rather than
//! ever unwinding across the boundary.

mod host_callbacks;
mod raw;
mod vtables;

use crate::raw::{OwnedDescriptor, RawPluginDescriptor, RawVersion};
use crate::vtables::FactoryHandle;
use std::cell::RefCell;
use std::ffi::{c_char, c_void, CStr, CString};
use std::os::raw::c_uint;
use std::panic::catch_unwind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use wclap_bridge::{BridgeConfig, Entry, Factory, HostCallbackTable, IndexHandle, IndexLookup, Plugin, PLUGIN_FACTORY_ID};
use wclap_engine::{ArenaPool, Instance, Module, WasiDirs};
use wclap_marshal::PluginDescriptor;

use crate::host_callbacks::HostPtr;

/// Failures that can surface while servicing the outer C ABI, collapsed to `lastError()`'s
/// string at every `extern "C"` boundary.
#[derive(Debug, thiserror::Error)]
enum FfiError {
    #[error(transparent)]
    Bridge(#[from] wclap_bridge::BridgeError),
    #[error(transparent)]
    Engine(#[from] wclap_engine::EngineError),
    #[error(transparent)]
    Instance(#[from] wclap_engine::InstanceError),
    #[error("failed to read bundle: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine is not initialized; call globalInit first")]
    EngineNotInitialized,
    #[error("bundle path is not valid UTF-8")]
    InvalidPath,
    #[error("no plugin with id {0:?} in this bundle")]
    PluginNotFound(String),
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Records `msg` as the calling thread's `lastError()`. Per `spec.md` §6 this is "the last
/// failure from `open` or `getFactory`" — the newest message always wins, unlike an
/// [`Instance`]'s poison error, which keeps the first.
pub(crate) fn set_last_error(msg: &str) {
    log::error!("{msg}");
    let cstring = CString::new(msg.replace('\0', "")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(cstring));
}

/// The process-wide engine handle retained between `globalInit` and `globalDeinit`. Every open
/// [`WclapModule`] holds its own `Arc<Engine>` too (via [`Module::open`]'s argument), so the
/// engine actually tears down only once both this handle and every open module have released it.
static ENGINE_HANDLE: Mutex<Option<Arc<wclap_engine::Engine>>> = Mutex::new(None);

/// One opened `.wclap` bundle: the compiled module, its live instance(s), and everything the
/// Bridge needs to answer `getFactory`/`createPlugin` (`spec.md` §4.F). The pointer a host holds
/// onto between `open` and `close` is a `*const WclapModule`.
pub struct WclapModule {
    _module: Module,
    instance: Arc<Instance>,
    audio_instance: Arc<Instance>,
    entry: Entry,
    factory: OnceLock<Option<Factory<'static>>>,
    descriptors: OnceLock<(Vec<OwnedDescriptor>, Vec<RawPluginDescriptor>)>,
    factory_handle: OnceLock<Box<FactoryHandle>>,
    host_table: Arc<IndexLookup<HostPtr>>,
    host_callbacks: HostCallbackTable,
    config: BridgeConfig,
    clap_version: RawVersion,
}

impl WclapModule {
    fn open_with_dirs(
        bundle_path: &Path,
        preset_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        var_dir: Option<PathBuf>,
    ) -> Result<Self, FfiError> {
        let bytes = std::fs::read(bundle_path.join("module.wasm"))?;
        let engine = wclap_engine::Engine::current().ok_or(FfiError::EngineNotInitialized)?;
        let module = Module::open(engine, &bytes)?;

        let dirs = WasiDirs {
            plugin_dir: Some(bundle_path.to_path_buf()),
            preset_dir,
            cache_dir,
            var_dir,
            must_link_dirs: false,
        };
        let instance = Arc::new(Instance::new(&module, dirs.clone())?);
        let audio_instance = if module.shape().has_shared_memory {
            Arc::new(Instance::new(&module, dirs)?)
        } else {
            Arc::clone(&instance)
        };

        let entry = Entry::resolve(&instance)?;
        let host_table = Arc::new(IndexLookup::new());
        let host_callbacks = host_callbacks::register(&instance, Arc::clone(&host_table))?;

        Ok(Self {
            _module: module,
            instance,
            audio_instance,
            entry,
            factory: OnceLock::new(),
            descriptors: OnceLock::new(),
            factory_handle: OnceLock::new(),
            host_table,
            host_callbacks,
            config: BridgeConfig::default(),
            clap_version: RawVersion { major: 1, minor: 2, revision: 2 },
        })
    }

    /// Lazily opens the bundle's `clap.plugin-factory`, caching the result for the module's
    /// lifetime. `Ok(None)` means the bundle doesn't implement that factory at all.
    fn factory(&self) -> Result<Option<&Factory<'static>>, FfiError> {
        if let Some(opened) = self.factory.get() {
            return Ok(opened.as_ref());
        }
        // SAFETY: `self.instance` is an `Arc<Instance>` owned by this `WclapModule` for as long
        // as `self` is alive. The cached `Factory<'static>` this produces is only ever read
        // through `self.factory`, which drops together with `self`, so treating the borrow as
        // `'static` here cannot outlive the `Instance` it actually points at.
        let instance: &'static Instance = unsafe { &*Arc::as_ptr(&self.instance) };
        let opened = Factory::open(instance, &self.entry, &self.config)?;
        Ok(self.factory.get_or_init(|| opened).as_ref())
    }

    /// Lazily enumerates and namespaces every plugin descriptor the factory exposes, owning the
    /// `CString` backing storage for as long as the module lives.
    fn descriptor_ptrs(&self) -> Result<&[RawPluginDescriptor], FfiError> {
        if let Some((_, ptrs)) = self.descriptors.get() {
            return Ok(ptrs);
        }
        let descs: Vec<PluginDescriptor> = match self.factory()? {
            Some(f) => f.descriptors()?.to_vec(),
            None => Vec::new(),
        };
        let owned: Vec<OwnedDescriptor> = descs.iter().map(OwnedDescriptor::new).collect();
        let ptrs: Vec<RawPluginDescriptor> = owned.iter().map(OwnedDescriptor::as_raw).collect();
        let (_, ptrs_ref) = self.descriptors.get_or_init(|| (owned, ptrs));
        Ok(ptrs_ref)
    }

    fn descriptor_index_for(&self, id: &str) -> Option<usize> {
        let factory = self.factory().ok()??;
        let descs = factory.descriptors().ok()?;
        descs.iter().position(|d| d.id == id)
    }

    pub(crate) fn factory_descriptor_count(&self) -> c_uint {
        match self.descriptor_ptrs() {
            Ok(ptrs) => u32::try_from(ptrs.len()).unwrap_or(u32::MAX),
            Err(e) => {
                set_last_error(&e.to_string());
                0
            }
        }
    }

    pub(crate) fn factory_descriptor_ptr(&self, index: c_uint) -> *const RawPluginDescriptor {
        match self.descriptor_ptrs() {
            Ok(ptrs) => {
                let i = usize::try_from(index).unwrap_or(usize::MAX);
                ptrs.get(i).map_or(std::ptr::null(), |p| p as *const RawPluginDescriptor)
            }
            Err(e) => {
                set_last_error(&e.to_string());
                std::ptr::null()
            }
        }
    }

    pub(crate) fn descriptor_ptr_for(&self, id: &str) -> *const RawPluginDescriptor {
        let Some(i) = self.descriptor_index_for(id) else { return std::ptr::null() };
        match self.descriptor_ptrs() {
            Ok(ptrs) => ptrs.get(i).map_or(std::ptr::null(), |p| p as *const RawPluginDescriptor),
            Err(_) => std::ptr::null(),
        }
    }

    pub(crate) fn host_table(&self) -> &IndexLookup<HostPtr> {
        &self.host_table
    }

    /// `createPlugin`: builds the sandbox-side host proxy, calls into the factory, and wraps the
    /// result in a [`Plugin`] (`spec.md` §4.F "Plugin creation").
    pub(crate) fn create_plugin(&self, id: &str, host_handle: IndexHandle) -> Result<Plugin, FfiError> {
        let factory = self.factory()?.ok_or_else(|| FfiError::PluginNotFound(id.to_string()))?;

        let mut pool = ArenaPool::new();
        let (host_arena, host_ptr) = Plugin::build_host_proxy(&self.instance, &mut pool, host_handle, self.host_callbacks)?;
        let mut create_arena = pool.claim(|| self.instance.malloc_arena())?;
        let create_result = factory.create_plugin(&mut create_arena, id, host_ptr);
        pool.release(create_arena);
        let sandbox_ptr = create_result?;

        let descriptor = factory
            .descriptors()?
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| FfiError::PluginNotFound(id.to_string()))?;

        Ok(Plugin::new(
            Arc::clone(&self.instance),
            Arc::clone(&self.audio_instance),
            sandbox_ptr,
            host_ptr,
            descriptor,
            host_handle,
            host_arena,
        ))
    }
}

fn cstr_to_path(ptr: *const c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: the outer ABI contract requires `ptr` to be either null or a valid, NUL-terminated
    // C string for the duration of this call.
    let s = unsafe { CStr::from_ptr(ptr) }.to_str().ok()?;
    Some(PathBuf::from(s))
}

unsafe fn open_impl(
    bundle_path: *const c_char,
    preset_dir: *const c_char,
    cache_dir: *const c_char,
    var_dir: *const c_char,
) -> *const c_void {
    let result = catch_unwind(|| {
        let bundle_path = cstr_to_path(bundle_path).ok_or(FfiError::InvalidPath)?;
        let module = WclapModule::open_with_dirs(&bundle_path, cstr_to_path(preset_dir), cstr_to_path(cache_dir), cstr_to_path(var_dir))?;
        Ok::<_, FfiError>(Box::into_raw(Box::new(module)).cast::<c_void>().cast_const())
    });
    match result {
        Ok(Ok(ptr)) => ptr,
        Ok(Err(e)) => {
            set_last_error(&e.to_string());
            std::ptr::null()
        }
        Err(_) => std::ptr::null(),
    }
}

/// `globalInit(deadlineMillis) -> bool`. A deadline of `0` means no epoch deadline (`spec.md`
/// §4.A). Idempotent for the same deadline; fails if called with a different one while any
/// module is still open.
///
/// # Safety
/// Callable from any thread; not safe to call concurrently with `globalDeinit`.
#[no_mangle]
pub unsafe extern "C" fn globalInit(deadline_millis: u32) -> bool {
    catch_unwind(|| {
        let deadline = if deadline_millis == 0 { None } else { Some(deadline_millis) };
        match wclap_engine::Engine::global_init(deadline) {
            Ok(engine) => {
                *ENGINE_HANDLE.lock().unwrap() = Some(engine);
                true
            }
            Err(e) => {
                set_last_error(&e.to_string());
                false
            }
        }
    })
    .unwrap_or(false)
}

/// `globalDeinit()`. Releases this API's reference to the process-wide engine; the engine itself
/// keeps running until every open [`WclapModule`] has also released its own reference.
///
/// # Safety
/// Callable from any thread; not safe to call concurrently with `globalInit`.
#[no_mangle]
pub unsafe extern "C" fn globalDeinit() {
    let _ = catch_unwind(|| {
        ENGINE_HANDLE.lock().unwrap().take();
    });
}

/// `open(bundlePath) -> opaque | null`.
///
/// # Safety
/// `bundle_path` must be a valid, NUL-terminated C string for the duration of this call.
#[no_mangle]
pub unsafe extern "C" fn open(bundle_path: *const c_char) -> *const c_void {
    open_impl(bundle_path, std::ptr::null(), std::ptr::null(), std::ptr::null())
}

/// `openWithDirs(bundlePath, presetDir, cacheDir, varDir) -> opaque | null`. Any of the three
/// directory arguments may be null to skip that grant (`spec.md` §4.C.3).
///
/// # Safety
/// Every non-null argument must be a valid, NUL-terminated C string for the duration of this
/// call.
#[no_mangle]
pub unsafe extern "C" fn openWithDirs(
    bundle_path: *const c_char,
    preset_dir: *const c_char,
    cache_dir: *const c_char,
    var_dir: *const c_char,
) -> *const c_void {
    open_impl(bundle_path, preset_dir, cache_dir, var_dir)
}

/// `close(opaque) -> bool`. Drops the module, releasing its instances and its reference to the
/// process-wide engine.
///
/// # Safety
/// `handle` must be a pointer previously returned by `open`/`openWithDirs`, not already closed.
#[no_mangle]
pub unsafe extern "C" fn close(handle: *mut c_void) -> bool {
    catch_unwind(|| {
        if handle.is_null() {
            return false;
        }
        drop(Box::from_raw(handle.cast::<WclapModule>()));
        true
    })
    .unwrap_or(false)
}

/// `version(opaque) -> pointer to {major, minor, revision}`: the CLAP ABI version this bridge
/// implements, stable for the lifetime of the module.
///
/// # Safety
/// `handle` must be a live pointer previously returned by `open`/`openWithDirs`.
#[no_mangle]
pub unsafe extern "C" fn version(handle: *const c_void) -> *const RawVersion {
    catch_unwind(|| {
        let module = &*handle.cast::<WclapModule>();
        &module.clap_version as *const RawVersion
    })
    .unwrap_or(std::ptr::null())
}

/// `getFactory(opaque, factoryId) -> pointer | null`. Only `clap.plugin-factory` is supported;
/// any other id, or a bundle that doesn't implement it, yields null.
///
/// # Safety
/// `handle` must be a live pointer previously returned by `open`/`openWithDirs`; `factory_id`
/// must be a valid, NUL-terminated C string for the duration of this call.
#[no_mangle]
pub unsafe extern "C" fn getFactory(handle: *const c_void, factory_id: *const c_char) -> *const c_void {
    let result = catch_unwind(|| {
        let module = &*handle.cast::<WclapModule>();
        let id = CStr::from_ptr(factory_id).to_str().map_err(|_| ())?;
        if id != PLUGIN_FACTORY_ID {
            return Ok(std::ptr::null());
        }
        match module.factory() {
            Ok(Some(_)) => {
                let fh = module.factory_handle.get_or_init(|| Box::new(FactoryHandle::new(handle.cast())));
                Ok(fh.as_ref() as *const FactoryHandle as *const c_void)
            }
            Ok(None) => Ok(std::ptr::null()),
            Err(e) => {
                set_last_error(&e.to_string());
                Ok(std::ptr::null())
            }
        }
    });
    match result {
        Ok(Ok(ptr)) => ptr,
        _ => std::ptr::null(),
    }
}

/// `lastError() -> cstring | null`: the calling thread's most recent failure from `open` or
/// `getFactory`. Valid until the next call into this API on the same thread.
#[no_mangle]
pub extern "C" fn lastError() -> *const c_char {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map_or(std::ptr::null(), |s| s.as_ptr()))
}
