//! Type-erased registry entries for feature slices.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// State a feature registers with the API at startup.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Short name used in startup logs.
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), state: Box::new(state) }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.state.name()
    }
}
