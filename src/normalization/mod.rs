pub mod airdate;
pub mod cell;
pub mod feature;
