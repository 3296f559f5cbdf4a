//! Collection content models. The two versions are separate types and do
//! not relate to each other.

pub mod v1_0;
pub mod v1_1;
