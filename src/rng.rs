use rand::Rng;

/// Random integer in `[min, max)`. Returns `min` when the range is empty.
pub fn random_range(rng: &mut impl Rng, min: usize, max: usize) -> usize {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Uniformly pick one element, or `None` for an empty slice.
pub fn random_select<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(random_range(rng, 0, items.len()))
}
