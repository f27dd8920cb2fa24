mod model_store;
mod observation_store;
mod similarity;

pub use model_store::IModelStore;
pub use observation_store::IObservationStore;
pub use similarity::ISimilarityProvider;
