pub mod chart;
pub mod columnar;
pub mod forward;
pub mod observation;
pub mod seasonal;
pub mod views;

pub use chart::*;
pub use columnar::*;
pub use forward::*;
pub use observation::*;
pub use seasonal::*;
pub use views::*;
