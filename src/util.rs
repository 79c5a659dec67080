pub mod date;

use rand::Rng;

pub const USER_AGENT: &str =
  concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// In-place Fisher-Yates shuffle, walking from the back.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
  for i in (1..items.len()).rev() {
    let j = rng.random_range(0..=i);
    items.swap(i, j);
  }
}
