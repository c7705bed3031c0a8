pub mod handler;
pub mod signer;
pub mod stage;

pub use handler::ItemHandler;
pub use signer::DigestProvider;
pub use stage::Stage;
