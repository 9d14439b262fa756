pub mod iso;
pub mod split;
pub mod toposort;

#[doc(inline)]
pub use self::{
    iso::{checksum, isomorphic},
    toposort::Cycle,
};
