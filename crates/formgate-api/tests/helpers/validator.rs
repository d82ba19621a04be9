//! Recording form validator

use async_trait::async_trait;
use formgate_core::FormId;
use formgate_services::{FormValidator, ValidatorError, ValidatorFactory};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidatorMode {
    Answer,
    BackendDown,
    BadCredential,
}

#[derive(Default)]
struct Calls {
    builds: Vec<String>,
    lookups: Vec<u64>,
}

pub struct FakeValidatorFactory {
    known: HashSet<u64>,
    mode: ValidatorMode,
    calls: Arc<Mutex<Calls>>,
}

impl FakeValidatorFactory {
    pub fn new(known: &[u64]) -> Self {
        Self {
            known: known.iter().copied().collect(),
            mode: ValidatorMode::Answer,
            calls: Arc::default(),
        }
    }

    pub fn with_mode(mode: ValidatorMode) -> Self {
        Self {
            mode,
            ..Self::new(&[])
        }
    }

    /// Credentials validators were built from
    pub fn builds(&self) -> Vec<String> {
        self.calls.lock().unwrap().builds.clone()
    }

    /// Form ids looked up, in order
    pub fn lookups(&self) -> Vec<u64> {
        self.calls.lock().unwrap().lookups.clone()
    }
}

struct FakeValidator {
    known: HashSet<u64>,
    mode: ValidatorMode,
    calls: Arc<Mutex<Calls>>,
}

#[async_trait]
impl FormValidator for FakeValidator {
    async fn validate(&self, form_id: FormId) -> Result<bool, ValidatorError> {
        self.calls.lock().unwrap().lookups.push(form_id.get());
        match self.mode {
            ValidatorMode::BackendDown => Err(ValidatorError::Backend("connection refused".into())),
            _ => Ok(self.known.contains(&form_id.get())),
        }
    }
}

#[async_trait]
impl ValidatorFactory for FakeValidatorFactory {
    async fn build(&self, credential: &str) -> Result<Box<dyn FormValidator>, ValidatorError> {
        self.calls.lock().unwrap().builds.push(credential.to_string());
        if self.mode == ValidatorMode::BadCredential {
            return Err(ValidatorError::Credential("unreadable key file".into()));
        }
        Ok(Box::new(FakeValidator {
            known: self.known.clone(),
            mode: self.mode,
            calls: self.calls.clone(),
        }))
    }
}
