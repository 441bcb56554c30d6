//! Moving, using and dropping values.

use super::*;

mod drops;
mod moves;
