/// Splits `items` into consecutive chunks of `size`; only the last may be shorter.
///
/// A `size` of zero is treated as one so the result always covers the input.
pub fn batches<T>(items: &[T], size: usize) -> Vec<&[T]> {
	items.chunks(size.max(1)).collect()
}
