use std::cmp::min;

const WINDOW_SIZE: usize = 0x1000;
const MIN_MATCH: usize = 3;

/// Find the longest match for `bytes[new_ptr..new_ptr + new_length]` inside the
/// window `bytes[old_ptr..old_ptr + old_length]`. Returns (length, displacement).
pub(crate) fn get_occurrence_length(
    bytes: &[u8],
    new_ptr: usize,
    new_length: usize,
    old_ptr: usize,
    old_length: usize,
) -> (usize, usize) {
    if new_length == 0 || old_length == 0 {
        return (0, 0);
    }

    let mut disp = 0;
    let mut max_length = 0;
    for i in 0..(old_length - 1) {
        let current_old_start = old_ptr + i;
        let mut current_length = 0;
        for j in 0..new_length {
            if bytes[current_old_start + j] != bytes[new_ptr + j] {
                break;
            }
            current_length += 1;
        }
        if current_length > max_length {
            max_length = current_length;
            disp = old_length - i;
            if max_length == new_length {
                break;
            }
        }
    }
    (max_length, disp)
}

/// Greedy LZ77 token stream over a 4096-byte window, appended to `output`.
///
/// Tokens are grouped eight to a flag byte, most significant bit first, with a
/// set bit marking a back-reference. Literals are copied as-is; references of
/// at least three bytes are written by `write_reference(block, length, disp)`.
pub(crate) fn encode_tokens<F>(
    bytes: &[u8],
    max_match: usize,
    output: &mut Vec<u8>,
    mut write_reference: F,
) where
    F: FnMut(&mut Vec<u8>, usize, usize),
{
    let mut block: Vec<u8> = Vec::with_capacity(8 * 4 + 1);
    block.push(0);
    let mut tokens = 0;
    let mut position = 0;
    while position < bytes.len() {
        if tokens == 8 {
            output.append(&mut block);
            block.push(0);
            tokens = 0;
        }

        let window = min(position, WINDOW_SIZE);
        let (length, disp) = get_occurrence_length(
            bytes,
            position,
            min(bytes.len() - position, max_match),
            position - window,
            window,
        );

        if length < MIN_MATCH {
            block.push(bytes[position]);
            position += 1;
        } else {
            block[0] |= 0x80 >> tokens;
            write_reference(&mut block, length, disp);
            position += length;
        }
        tokens += 1;
    }
    if tokens > 0 {
        output.append(&mut block);
    }
}
