//! Input/output.
//!
//! - instrument file readers: CV, IV, EP and measurement logs
//! - the sweep reconstruction shared by CV and IV (`sweep`)
//! - declarative header-line schema and text access (`schema`, `source`)
//! - CSV/JSON exports (`export`, `fit_file`)

pub mod cv;
pub mod ep;
pub mod export;
pub mod fit_file;
pub mod iv;
pub mod measurement_log;
pub mod schema;
pub mod source;
pub mod sweep;

pub use cv::{read_cv, read_cv_records};
pub use ep::{read_ep, read_ep_points};
pub use export::*;
pub use fit_file::*;
pub use iv::{read_iv, read_iv_records};
pub use measurement_log::{NoiseRule, read_log, read_log_fields, read_log_with};
pub use source::TextSource;
pub use sweep::reconstruct_sweep;
