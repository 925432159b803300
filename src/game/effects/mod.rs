// Full-screen and particle effects

pub mod blur;
pub mod particles;

pub use blur::{BlurConfig, VariableBlurEffect};
pub use particles::{AuraEmitter, FireEmitter};
