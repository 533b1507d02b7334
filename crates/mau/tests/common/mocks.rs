use mausim_core::common::{EvalError, HashGroupId};
use mausim_core::hash::HashGroupSource;
use mausim_core::{BitField, Phv};
use mockall::mock;

mock! {
    pub GroupSource {}
    impl HashGroupSource for GroupSource {
        fn hash_group(&self, group: HashGroupId, phv: &Phv) -> Result<BitField, EvalError>;
    }
}
