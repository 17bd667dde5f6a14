pub mod rename;
pub mod run;
pub mod split;
