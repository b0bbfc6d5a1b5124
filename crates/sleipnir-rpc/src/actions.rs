//! Action registration and dispatch.

use sleipnir_core::Universe;

use crate::error::{Result, RpcError};
use crate::request::Request;
use crate::response::Response;

/// Maximum number of registered actions.
pub const MAX_ACTIONS: usize = 16;

/// Maximum method name length in bytes, stored without terminator.
pub const MAX_METHOD_LEN: usize = 30;

/// An action handler: the universe handle plus the decoded request in, a
/// response out.
pub type Handler = fn(&Universe, &Request) -> Result<Response>;

struct Action {
    method: [u8; MAX_METHOD_LEN],
    /// `name_len | (param_count << 5)`; never zero for a live entry.
    attr: u8,
    handler: Handler,
}

/// Routes a request's method name to its registered handler.
///
/// The table is populated once at startup and read-only afterwards, so
/// lookups take no lock. Matching compares the packed attribute byte first
/// (length and arity in one probe) and the method bytes second.
pub struct Dispatcher {
    actions: Vec<Action>,
}

impl Dispatcher {
    /// Create an empty dispatch table.
    pub fn new() -> Self {
        Self {
            actions: Vec::with_capacity(MAX_ACTIONS),
        }
    }

    /// Register a handler under `method` with the given parameter arity.
    ///
    /// Fails when the table is full, the name is empty or longer than
    /// [`MAX_METHOD_LEN`], or the arity exceeds the attribute encoding.
    /// All of these are startup logic errors.
    pub fn register(&mut self, method: &str, param_count: usize, handler: Handler) -> Result<()> {
        if self.actions.len() >= MAX_ACTIONS {
            return Err(RpcError::CapacityExceeded);
        }
        if method.is_empty() {
            return Err(RpcError::ZeroLength);
        }
        if method.len() > MAX_METHOD_LEN || param_count > 0x07 {
            return Err(RpcError::CapacityExceeded);
        }

        let mut stored = [0_u8; MAX_METHOD_LEN];
        stored[..method.len()].copy_from_slice(method.as_bytes());
        self.actions.push(Action {
            method: stored,
            attr: method.len() as u8 | (param_count as u8) << 5,
            handler,
        });
        Ok(())
    }

    /// Route `request` to its handler and run it.
    pub fn dispatch(&self, universe: &Universe, request: &Request) -> Result<Response> {
        let attr = request.method_attr()?;
        let name = request.method().as_bytes();
        for action in &self.actions {
            let len = (action.attr & 0x1F) as usize;
            if action.attr == attr && &action.method[..len] == name {
                return (action.handler)(universe, request);
            }
        }
        Err(RpcError::MethodNotFound)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        let mut dispatcher = Self::new();
        register_builtin_actions(&mut dispatcher)
            .unwrap_or_else(|_| unreachable!("builtin action table overflow"));
        dispatcher
    }
}

/// Register every built-in action. Called once at daemon startup.
pub fn register_builtin_actions(dispatcher: &mut Dispatcher) -> Result<()> {
    dispatcher.register("get_uniform_integer", 3, get_uniform_integer)?;
    dispatcher.register("get_uniform_real", 3, get_uniform_real)?;
    dispatcher.register("get_weighted_integer", 3, get_weighted_integer)?;
    dispatcher.register("create_kernel", 0, create_kernel)?;
    dispatcher.register("delete_kernel", 1, delete_kernel)?;
    dispatcher.register("compile_macro", 4, compile_macro)?;
    dispatcher.register("create_system", 1, create_system)?;
    dispatcher.register("delete_system", 1, delete_system)?;
    dispatcher.register("create_state", 4, create_state)?;
    dispatcher.register("delete_state", 2, delete_state)?;
    dispatcher.register("modify_state", 5, modify_state)?;
    dispatcher.register("measure_state", 5, measure_state)?;
    dispatcher.register("compute_result", 4, compute_result)?;
    Ok(())
}

fn get_uniform_integer(universe: &Universe, request: &Request) -> Result<Response> {
    let count: usize = request.parameter(0)?;
    let low: u64 = request.parameter(1)?;
    let high: u64 = request.parameter(2)?;

    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        result.push(universe.generator().uniform_integer(low, high)?);
    }
    Ok(Response::result(result))
}

fn get_uniform_real(universe: &Universe, request: &Request) -> Result<Response> {
    let count: usize = request.parameter(0)?;
    let low: f64 = request.parameter(1)?;
    let high: f64 = request.parameter(2)?;

    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        result.push(universe.generator().uniform_real(low, high)?);
    }
    Ok(Response::result(result))
}

fn get_weighted_integer(universe: &Universe, request: &Request) -> Result<Response> {
    let count: usize = request.parameter(0)?;
    let size: usize = request.parameter(1)?;
    let weights: Vec<f64> = request.parameter(2)?;
    if weights.len() != size {
        return Err(RpcError::BadValues);
    }

    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        result.push(universe.generator().weighted_integer(&weights)?);
    }
    Ok(Response::result(result))
}

fn create_kernel(universe: &Universe, _request: &Request) -> Result<Response> {
    Ok(Response::result(universe.create_kernel()))
}

fn delete_kernel(universe: &Universe, request: &Request) -> Result<Response> {
    let kernel_id: u64 = request.parameter(0)?;
    Ok(Response::result(universe.delete_kernel(kernel_id)))
}

fn compile_macro(universe: &Universe, request: &Request) -> Result<Response> {
    let kernel_id: u64 = request.parameter(0)?;
    let dialect: String = request.parameter(1)?;
    let text: String = request.parameter(2)?;
    let delimiter = request.delimiter(3)?;

    let macro_id = universe.compile_macro(kernel_id, &dialect, &text, delimiter)?;
    Ok(Response::result(macro_id))
}

fn create_system(universe: &Universe, request: &Request) -> Result<Response> {
    let state_type: String = request.parameter(0)?;
    Ok(Response::result(universe.create_system(&state_type)?))
}

fn delete_system(universe: &Universe, request: &Request) -> Result<Response> {
    let system_id: u64 = request.parameter(0)?;
    Ok(Response::result(universe.delete_system(system_id)))
}

fn create_state(universe: &Universe, request: &Request) -> Result<Response> {
    let system_id: u64 = request.parameter(0)?;
    let dialect: String = request.parameter(1)?;
    let text: String = request.parameter(2)?;
    let delimiter = request.delimiter(3)?;

    let state_id = universe.create_state(system_id, &dialect, &text, delimiter)?;
    Ok(Response::result(state_id))
}

fn delete_state(universe: &Universe, request: &Request) -> Result<Response> {
    let system_id: u64 = request.parameter(0)?;
    let state_id: u64 = request.parameter(1)?;
    Ok(Response::result(universe.delete_state(system_id, state_id)))
}

fn modify_state(universe: &Universe, request: &Request) -> Result<Response> {
    let system_id: u64 = request.parameter(0)?;
    let state_id: u64 = request.parameter(1)?;
    let dialect: String = request.parameter(2)?;
    let text: String = request.parameter(3)?;
    let delimiter = request.delimiter(4)?;

    let modified = universe.modify_state(system_id, state_id, &dialect, &text, delimiter)?;
    Ok(Response::result(modified))
}

fn measure_state(universe: &Universe, request: &Request) -> Result<Response> {
    let system_id: u64 = request.parameter(0)?;
    let state_id: u64 = request.parameter(1)?;
    let dialect: String = request.parameter(2)?;
    let text: String = request.parameter(3)?;
    let delimiter = request.delimiter(4)?;

    let mut output = Vec::new();
    let measured =
        universe.measure_state(system_id, state_id, &dialect, &text, delimiter, &mut output)?;
    if !measured {
        return Err(RpcError::StateNotFound);
    }
    Ok(Response::result(String::from_utf8_lossy(&output)))
}

fn compute_result(universe: &Universe, request: &Request) -> Result<Response> {
    let system_id: u64 = request.parameter(0)?;
    let dialect: String = request.parameter(1)?;
    let text: String = request.parameter(2)?;
    let delimiter = request.delimiter(3)?;

    let mut output = Vec::new();
    let computed = universe.compute_result(system_id, &dialect, &text, delimiter, &mut output)?;
    if !computed {
        return Err(RpcError::StateNotFound);
    }
    Ok(Response::result(String::from_utf8_lossy(&output)))
}
