pub mod split;
pub mod publish;
