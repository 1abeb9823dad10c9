//! Parameter storage types
//!
//! Key-value store for tunable configuration, consumed read-only by the
//! control tick after startup. Persistence (flash, ground-station upload)
//! is handled by external collaborators; this layer only holds values,
//! metadata and the dirty flag those collaborators need.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 64;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter is hidden from external enumeration
        const HIDDEN = 0b0000_0001;
        /// Parameter is read-only after startup
        const READ_ONLY = 0b0000_0010;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    pub fn as_bool(&self) -> Result<bool, ParameterError> {
        match self {
            ParamValue::Bool(v) => Ok(*v),
            _ => Err(ParameterError::TypeMismatch),
        }
    }

    pub fn as_int(&self) -> Result<i32, ParameterError> {
        match self {
            ParamValue::Int(v) => Ok(*v),
            _ => Err(ParameterError::TypeMismatch),
        }
    }

    pub fn as_float(&self) -> Result<f32, ParameterError> {
        match self {
            ParamValue::Float(v) => Ok(*v),
            _ => Err(ParameterError::TypeMismatch),
        }
    }
}

/// Parameter metadata
#[derive(Debug, Clone)]
pub struct ParamMetadata {
    pub flags: ParamFlags,
}

/// Parameter store for configuration management
pub struct ParameterStore {
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    metadata: FnvIndexMap<String<PARAM_NAME_LEN>, ParamMetadata, MAX_PARAMS>,
    /// Needs persistence by the external storage collaborator
    dirty: bool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
    let mut k = String::new();
    k.push_str(name).map_err(|_| ParameterError::InvalidConfig)?;
    Ok(k)
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            metadata: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let k = key(name).ok()?;
        self.parameters.get(&k)
    }

    /// Set parameter value
    ///
    /// Fails for unknown or read-only parameters; marks the store dirty.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let k = key(name)?;
        if !self.parameters.contains_key(&k) {
            return Err(ParameterError::InvalidConfig);
        }
        if let Some(meta) = self.metadata.get(&k) {
            if meta.flags.contains(ParamFlags::READ_ONLY) {
                return Err(ParameterError::ReadOnly);
            }
        }
        self.parameters.insert(k, value).ok();
        self.dirty = true;
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// Idempotent: an existing parameter keeps its current value.
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let k = key(name)?;
        if self.parameters.contains_key(&k) {
            return Ok(());
        }
        self.parameters
            .insert(k.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.metadata
            .insert(k, ParamMetadata { flags })
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Get all parameter names (excluding hidden parameters)
    pub fn iter_names(&self) -> impl Iterator<Item = &String<PARAM_NAME_LEN>> {
        self.parameters.keys().filter(|name| {
            self.metadata
                .get(*name)
                .map(|m| !m.flags.contains(ParamFlags::HIDDEN))
                .unwrap_or(true)
        })
    }

    /// Parameter count (excluding hidden parameters)
    pub fn count(&self) -> usize {
        self.iter_names().count()
    }

    /// Check if store has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear dirty flag (called after a successful save)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
