pub mod batch_result;
pub mod loaders;
pub mod outcome;
pub mod work_item;

pub use batch_result::{BatchRecorder, BatchResult, ItemRecord};
pub use loaders::{default_work_list, load_work_list};
pub use outcome::ExecutionOutcome;
pub use work_item::{WorkItem, WorkList};
