//! Raw `gsapi` bindings and the canonical call sequence.

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_void};
use std::sync::Mutex;

use tracing::trace;

use crate::{EngineError, Interpreter};

const GS_ARG_ENCODING_UTF8: c_int = 1;
/// Sentinel "Quit" exit code; success-equivalent per the gsapi contract.
const GS_ERROR_QUIT: c_int = -101;

#[link(name = "gs")]
extern "C" {
    fn gsapi_new_instance(pinstance: *mut *mut c_void, caller_handle: *mut c_void) -> c_int;
    fn gsapi_set_arg_encoding(instance: *mut c_void, encoding: c_int) -> c_int;
    fn gsapi_init_with_args(instance: *mut c_void, argc: c_int, argv: *mut *mut c_char) -> c_int;
    fn gsapi_exit(instance: *mut c_void) -> c_int;
    fn gsapi_delete_instance(instance: *mut c_void);
}

// The gsapi surface carries global state and allows one instance per
// process; all runs serialize on this lock.
static ENGINE_LOCK: Mutex<()> = Mutex::new(());

pub struct GhostscriptInterpreter;

impl GhostscriptInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GhostscriptInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn is_ok(code: c_int) -> bool {
    code == 0 || code == GS_ERROR_QUIT
}

impl Interpreter for GhostscriptInterpreter {
    fn run(&self, args: &[String]) -> Result<(), EngineError> {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // argv[0] is a placeholder the engine skips.
        let mut owned: Vec<CString> = Vec::with_capacity(args.len() + 1);
        owned.push(CString::default());
        for arg in args {
            owned.push(
                CString::new(arg.as_str()).map_err(|_| EngineError::InvalidArg(arg.clone()))?,
            );
        }
        let mut argv: Vec<*mut c_char> = owned
            .iter()
            .map(|c| c.as_ptr() as *mut c_char)
            .collect();

        let mut instance: *mut c_void = std::ptr::null_mut();
        let code = unsafe { gsapi_new_instance(&mut instance, std::ptr::null_mut()) };
        if code < 0 {
            return Err(EngineError::Instance(code));
        }
        trace!("created gs instance");

        let mut code = unsafe { gsapi_set_arg_encoding(instance, GS_ARG_ENCODING_UTF8) };
        if code == 0 {
            code = unsafe {
                gsapi_init_with_args(instance, argv.len() as c_int, argv.as_mut_ptr())
            };
            if is_ok(code) {
                trace!("conversion processed");
            }
        }

        // Always exit and delete, whatever init returned.
        let exit_code = unsafe { gsapi_exit(instance) };
        if is_ok(code) {
            code = exit_code;
        }
        unsafe { gsapi_delete_instance(instance) };
        trace!("deleted gs instance");

        if is_ok(code) {
            Ok(())
        } else {
            Err(EngineError::Failed(code))
        }
    }
}
