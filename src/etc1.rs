use std::sync::OnceLock;

use image::Rgba;
use tracing::trace;

/// Maps a position in the caller's scan order to the column-major pixel
/// index used inside a block. The permutation has cycle length 4, so three
/// applications give its inverse.
pub const ORDER_3DS: [usize; 16] = [0, 4, 1, 5, 8, 12, 9, 13, 2, 6, 3, 7, 10, 14, 11, 15];

pub const MODIFIERS: [[i32; 4]; 8] = [
    [2, 8, -2, -8],
    [5, 17, -5, -17],
    [9, 29, -9, -29],
    [13, 42, -13, -42],
    [18, 60, -18, -60],
    [24, 80, -24, -80],
    [33, 106, -33, -106],
    [47, 183, -47, -183],
];

/// Alpha plane used when a texture carries no alpha: every nibble is 0xF.
pub const OPAQUE_ALPHA: u64 = u64::MAX;

const MAX_ERROR: i32 = 99_999_999;
const WIDEN_THRESHOLD: i32 = 9000;
const NEAR_DELTAS: [i32; 9] = [-4, -3, -2, -1, 0, 1, 2, 3, 4];
const FAR_DELTAS: [i32; 8] = [-8, -7, -6, -5, 5, 6, 7, 8];
const DIFF_DELTAS: [i32; 8] = [-4, -3, -2, -1, 0, 1, 2, 3];

fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

fn sign3(value: u8) -> i32 {
    ((value as i32 + 4) % 8) - 4
}

fn scale_channel(value: u8, limit: i32) -> i32 {
    let value = value as i32;
    if limit == 16 {
        value * 17
    } else {
        (value << 3) | (value >> 2)
    }
}

/// Perceptual error: green weighs most, then blue, then red.
fn weighted_error(r: i32, g: i32, b: i32) -> i32 {
    2 * r * r + 4 * g * g + 3 * b * b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    fn offset(self, modifier: i32) -> Rgb {
        Rgb::new(
            clamp(self.r as i32 + modifier),
            clamp(self.g as i32 + modifier),
            clamp(self.b as i32 + modifier),
        )
    }

    fn error(self, other: Rgb) -> i32 {
        weighted_error(
            self.r as i32 - other.r as i32,
            self.g as i32 - other.g as i32,
            self.b as i32 - other.b as i32,
        )
    }

    fn average(pixels: &[Rgb]) -> Rgb {
        let count = pixels.len().max(1) as u32;
        let (r, g, b) = pixels.iter().fold((0u32, 0u32, 0u32), |(r, g, b), p| {
            (r + p.r as u32, g + p.g as u32, b + p.b as u32)
        });
        Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
    }

    fn scale(self, limit: i32) -> Rgb {
        Rgb::new(
            scale_channel(self.r, limit) as u8,
            scale_channel(self.g, limit) as u8,
            scale_channel(self.b, limit) as u8,
        )
    }

    fn unscale(self, limit: i32) -> Rgb {
        let unscale = |v: u8| (v as i32 * limit / 256) as u8;
        Rgb::new(unscale(self.r), unscale(self.g), unscale(self.b))
    }
}

impl From<Rgba<u8>> for Rgb {
    fn from(color: Rgba<u8>) -> Self {
        Rgb::new(color[0], color[1], color[2])
    }
}

/// One 8-byte ETC1 block.
///
/// Fields are kept in their natural big-endian order `R, G, B, flags,
/// MSB, LSB`. Texture streams store the 8 bytes reversed, which
/// [`Etc1Block::from_bytes`] and [`Etc1Block::to_bytes`] undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Etc1Block {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub flags: u8,
    pub msb: u16,
    pub lsb: u16,
}

impl Etc1Block {
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        let mut natural = bytes;
        natural.reverse();
        Etc1Block {
            r: natural[0],
            g: natural[1],
            b: natural[2],
            flags: natural[3],
            msb: u16::from_be_bytes([natural[4], natural[5]]),
            lsb: u16::from_be_bytes([natural[6], natural[7]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let msb = self.msb.to_be_bytes();
        let lsb = self.lsb.to_be_bytes();
        let mut bytes = [
            self.r, self.g, self.b, self.flags, msb[0], msb[1], lsb[0], lsb[1],
        ];
        bytes.reverse();
        bytes
    }

    pub fn flip(&self) -> bool {
        self.flags & 1 == 1
    }

    pub fn set_flip(&mut self, value: bool) {
        self.flags = (self.flags & !1) | value as u8;
    }

    pub fn diff(&self) -> bool {
        self.flags & 2 == 2
    }

    pub fn set_diff(&mut self, value: bool) {
        self.flags = (self.flags & !2) | ((value as u8) << 1);
    }

    pub fn table0(&self) -> usize {
        ((self.flags >> 5) & 7) as usize
    }

    pub fn set_table0(&mut self, table: usize) {
        self.flags = (self.flags & !(7 << 5)) | (((table & 7) as u8) << 5);
    }

    pub fn table1(&self) -> usize {
        ((self.flags >> 2) & 7) as usize
    }

    pub fn set_table1(&mut self, table: usize) {
        self.flags = (self.flags & !(7 << 2)) | (((table & 7) as u8) << 2);
    }

    /// Modifier index of the block pixel `index` (column-major).
    pub fn selector(&self, index: usize) -> usize {
        (((self.msb >> index) & 1) * 2 + ((self.lsb >> index) & 1)) as usize
    }

    fn color_depth(&self) -> i32 {
        if self.diff() {
            32
        } else {
            16
        }
    }

    fn base_colors(&self) -> (Rgb, Rgb) {
        if self.diff() {
            let c0 = Rgb::new(self.r >> 3, self.g >> 3, self.b >> 3);
            // Out-of-range deltas wrap within 5 bits.
            let apply = |base: u8, packed: u8| ((base as i32 + sign3(packed & 7)) & 0x1F) as u8;
            let c1 = Rgb::new(apply(c0.r, self.r), apply(c0.g, self.g), apply(c0.b, self.b));
            (c0, c1)
        } else {
            (
                Rgb::new(self.r >> 4, self.g >> 4, self.b >> 4),
                Rgb::new(self.r & 0xF, self.g & 0xF, self.b & 0xF),
            )
        }
    }

    /// Decode to 16 colors in the caller's scan order. `alpha` holds one
    /// nibble per block pixel; pass [`OPAQUE_ALPHA`] for opaque blocks.
    pub fn decode(&self, alpha: u64) -> [Rgba<u8>; 16] {
        let depth = self.color_depth();
        let (c0, c1) = self.base_colors();
        let bases = [c0.scale(depth), c1.scale(depth)];
        let tables = [MODIFIERS[self.table0()], MODIFIERS[self.table1()]];
        let mask = if self.flip() { 2 } else { 8 };

        let mut colors = [Rgba([0, 0, 0, 0]); 16];
        for (color, &index) in colors.iter_mut().zip(ORDER_3DS.iter()) {
            let sub_block = usize::from(index & mask != 0);
            let c = bases[sub_block].offset(tables[sub_block][self.selector(index)]);
            let a = ((alpha >> (4 * index)) & 0xF) as u8 * 17;
            *color = Rgba([c.r, c.g, c.b, a]);
        }
        colors
    }
}

/// Encode 16 colors given in the caller's scan order. Returns the alpha plane
/// (4 bits per pixel) together with the color block.
pub fn encode_block(colors: &[Rgba<u8>; 16]) -> (u64, Etc1Block) {
    let ordered: [Rgba<u8>; 16] =
        std::array::from_fn(|j| colors[ORDER_3DS[ORDER_3DS[ORDER_3DS[j]]]]);
    let alpha = ordered
        .iter()
        .rev()
        .fold(0u64, |alpha, color| (alpha << 4) | (color[3] >> 4) as u64);
    let pixels = ordered.map(Rgb::from);
    (alpha, Optimizer::encode(&pixels))
}

/// Solid color lookup indexed by `((diff * 8 + table) * 4 + selector) * 256 + color`.
/// Each entry packs `|error| << 8 | packed_color` for the best packed color.
fn inverse_lookup() -> &'static [u16] {
    static LOOKUP: OnceLock<Vec<u16>> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        let mut lookup = Vec::with_capacity(2 * 8 * 4 * 256);
        for limit in [16, 32] {
            for table in MODIFIERS.iter() {
                for &modifier in table.iter() {
                    for color in 0..256i32 {
                        let best = (0..limit as u8)
                            .map(|packed| {
                                let scaled = scale_channel(packed, limit);
                                let error = (clamp(scaled + modifier) as i32 - color).abs();
                                ((error as u16) << 8) | packed as u16
                            })
                            .min()
                            .unwrap_or(0);
                        lookup.push(best);
                    }
                }
            }
        }
        lookup
    })
}

fn pack_solid_color(color: Rgb) -> Etc1Block {
    let lookup = inverse_lookup();
    let mut best_index = 0;
    let mut best_error = i32::MAX;
    let mut best_packed = Rgb::default();
    for index in 0..64 {
        let r = lookup[index * 256 + color.r as usize];
        let g = lookup[index * 256 + color.g as usize];
        let b = lookup[index * 256 + color.b as usize];
        let error = weighted_error((r >> 8) as i32, (g >> 8) as i32, (b >> 8) as i32);
        if error < best_error {
            best_error = error;
            best_index = index;
            best_packed = Rgb::new(r as u8, g as u8, b as u8);
            if error == 0 {
                break;
            }
        }
    }

    let diff = best_index & 32 == 32;
    let multiplier = if diff { 8 } else { 17 };
    let table = (best_index >> 2) & 7;
    let mut block = Etc1Block {
        r: best_packed.r * multiplier,
        g: best_packed.g * multiplier,
        b: best_packed.b * multiplier,
        flags: 0,
        msb: if best_index & 2 != 0 { 0xFFFF } else { 0 },
        lsb: if best_index & 1 != 0 { 0xFFFF } else { 0 },
    };
    block.set_diff(diff);
    block.set_table0(table);
    block.set_table1(table);
    trace!(error = best_error, diff, table, "Packed solid ETC1 block");
    block
}

#[derive(Debug, Clone, Copy, Default)]
struct Solution {
    error: i32,
    color: Rgb,
    table: usize,
    selector_msb: u8,
    selector_lsb: u8,
}

struct SolutionSet {
    flip: bool,
    diff: bool,
    solutions: [Solution; 2],
}

/// Spread the 8 selector bits of one flipped sub-block (2 rows of 4) over the
/// column-major 16-bit layout.
fn spread_flipped(bits: u8) -> u16 {
    let bits = bits as u16;
    (bits & 0xC0) * 64 + (bits & 0x30) * 16 + (bits & 0xC) * 4 + (bits & 0x3)
}

impl SolutionSet {
    fn pack(&self) -> Etc1Block {
        let [s0, s1] = self.solutions;
        let mut block = Etc1Block::default();
        block.set_diff(self.diff);
        block.set_flip(self.flip);
        block.set_table0(s0.table);
        block.set_table1(s1.table);

        if self.flip {
            block.msb = spread_flipped(s0.selector_msb) + 4 * spread_flipped(s1.selector_msb);
            block.lsb = spread_flipped(s0.selector_lsb) + 4 * spread_flipped(s1.selector_lsb);
        } else {
            block.msb = s0.selector_msb as u16 + 256 * s1.selector_msb as u16;
            block.lsb = s0.selector_lsb as u16 + 256 * s1.selector_lsb as u16;
        }

        let (c0, c1) = (s0.color, s1.color);
        if self.diff {
            let delta = |a: u8, b: u8| ((b as i32 - a as i32 + 8) % 8) as u8;
            block.r = c0.r * 8 + delta(c0.r, c1.r);
            block.g = c0.g * 8 + delta(c0.g, c1.g);
            block.b = c0.b * 8 + delta(c0.b, c1.b);
        } else {
            block.r = c0.r * 16 + c1.r;
            block.g = c0.g * 16 + c1.g;
            block.b = c0.b * 16 + c1.b;
        }
        block
    }
}

/// Search state for a single 8-pixel sub-block.
struct Optimizer<'a> {
    pixels: &'a [Rgb],
    base_color: Rgb,
    limit: i32,
    best: Solution,
}

impl<'a> Optimizer<'a> {
    fn new(pixels: &'a [Rgb], limit: i32, error: i32) -> Self {
        Optimizer {
            pixels,
            base_color: Rgb::average(pixels).unscale(limit),
            limit,
            best: Solution {
                error,
                ..Solution::default()
            },
        }
    }

    fn encode(pixels: &[Rgb; 16]) -> Etc1Block {
        if pixels.iter().all(|p| *p == pixels[0]) {
            return pack_solid_color(pixels[0]);
        }

        let mut best_error = MAX_ERROR;
        let mut best: Option<SolutionSet> = None;
        for flip in [false, true] {
            let divisor = if flip { 2 } else { 8 };
            let mut pixels0 = Vec::with_capacity(8);
            let mut pixels1 = Vec::with_capacity(8);
            for (j, pixel) in pixels.iter().enumerate() {
                if (j / divisor) % 2 == 0 {
                    pixels0.push(*pixel);
                } else {
                    pixels1.push(*pixel);
                }
            }

            for diff in [false, true] {
                let limit = if diff { 32 } else { 16 };
                let mut opt0 = Optimizer::new(&pixels0, limit, best_error);
                if !opt0.search() || opt0.best.error >= best_error {
                    continue;
                }

                let mut opt1 = Optimizer::new(&pixels1, limit, best_error - opt0.best.error);
                let found = if diff {
                    opt1.base_color = opt0.best.color;
                    opt1.compute_deltas(&DIFF_DELTAS)
                } else {
                    opt1.search()
                };
                if !found {
                    continue;
                }

                let total = opt0.best.error + opt1.best.error;
                if total < best_error {
                    best_error = total;
                    best = Some(SolutionSet {
                        flip,
                        diff,
                        solutions: [opt0.best, opt1.best],
                    });
                }
            }
        }

        match best {
            Some(set) => {
                trace!(error = best_error, flip = set.flip, diff = set.diff, "Packed ETC1 block");
                set.pack()
            }
            None => pack_solid_color(Rgb::average(pixels)),
        }
    }

    fn search(&mut self) -> bool {
        let mut success = self.compute_deltas(&NEAR_DELTAS);
        if self.best.error > WIDEN_THRESHOLD {
            success |= self.compute_deltas(&FAR_DELTAS);
        }
        success
    }

    fn compute_deltas(&mut self, deltas: &[i32]) -> bool {
        let limit = self.limit;
        let in_range = |value: i32| value >= 0 && value < limit;
        let base = self.base_color;
        let mut candidates = Vec::with_capacity(deltas.len().pow(3));
        for zd in deltas {
            let z = zd + base.b as i32;
            if !in_range(z) {
                continue;
            }
            for yd in deltas {
                let y = yd + base.g as i32;
                if !in_range(y) {
                    continue;
                }
                for xd in deltas {
                    let x = xd + base.r as i32;
                    if in_range(x) {
                        candidates.push(Rgb::new(x as u8, y as u8, z as u8));
                    }
                }
            }
        }
        self.test_unscaled_colors(&candidates)
    }

    fn test_unscaled_colors(&mut self, colors: &[Rgb]) -> bool {
        let mut success = false;
        for &color in colors {
            for table in 0..MODIFIERS.len() {
                if self.evaluate(color, table) {
                    success = true;
                    if self.best.error == 0 {
                        return true;
                    }
                }
            }
        }
        success
    }

    /// Score `color` with `table`, replacing the best solution only if the
    /// total error beats it. Gives up as soon as the running error does not.
    fn evaluate(&mut self, color: Rgb, table: usize) -> bool {
        let scaled = color.scale(self.limit);
        let palette: [Rgb; 4] = std::array::from_fn(|k| scaled.offset(MODIFIERS[table][k]));
        let mut solution = Solution {
            error: 0,
            color,
            table,
            selector_msb: 0,
            selector_lsb: 0,
        };
        for (i, pixel) in self.pixels.iter().enumerate() {
            let mut best_j = 0;
            let mut best_error = MAX_ERROR;
            for (j, candidate) in palette.iter().enumerate() {
                let error = pixel.error(*candidate);
                if error < best_error {
                    best_error = error;
                    best_j = j;
                }
            }
            solution.error += best_error;
            if solution.error >= self.best.error {
                return false;
            }
            solution.selector_msb |= ((best_j >> 1) << i) as u8;
            solution.selector_lsb |= ((best_j & 1) << i) as u8;
        }
        self.best = solution;
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn uniform(color: [u8; 4]) -> [Rgba<u8>; 16] {
        [Rgba(color); 16]
    }

    fn block_x(scan_index: usize) -> usize {
        ORDER_3DS[scan_index] / 4
    }

    fn block_y(scan_index: usize) -> usize {
        ORDER_3DS[scan_index] % 4
    }

    #[test]
    fn order3ds_has_cycle_length_four() {
        for i in 0..16 {
            assert_eq!(i, ORDER_3DS[ORDER_3DS[ORDER_3DS[ORDER_3DS[i]]]]);
            let inverse = ORDER_3DS[ORDER_3DS[ORDER_3DS[i]]];
            assert_eq!(i, ORDER_3DS[inverse]);
        }
    }

    #[test]
    fn block_bytes_are_reversed_on_the_stream() {
        let block = Etc1Block {
            r: 0x11,
            g: 0x22,
            b: 0x33,
            flags: 0x44,
            msb: 0x5566,
            lsb: 0x7788,
        };
        let bytes = block.to_bytes();
        assert_eq!([0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11], bytes);
        assert_eq!(block, Etc1Block::from_bytes(bytes));
    }

    #[test]
    fn flag_accessors() {
        let mut block = Etc1Block::default();
        block.set_flip(true);
        block.set_diff(true);
        block.set_table0(5);
        block.set_table1(3);
        assert_eq!(0b1010_1111, block.flags);
        assert!(block.flip());
        assert!(block.diff());
        assert_eq!(5, block.table0());
        assert_eq!(3, block.table1());
        block.set_flip(false);
        assert!(!block.flip());
        assert_eq!(3, block.table1());
    }

    #[test]
    fn decode_individual_mode_uniform() {
        let block = Etc1Block {
            r: 0x88,
            g: 0x88,
            b: 0x88,
            ..Etc1Block::default()
        };
        let colors = block.decode(OPAQUE_ALPHA);
        assert!(colors.iter().all(|c| *c == Rgba([138, 138, 138, 255])));
    }

    #[test]
    fn decode_individual_mode_splits_columns() {
        // Sub-block 0 is black, sub-block 1 is red; both get the +2 modifier.
        let block = Etc1Block {
            r: 0x0F,
            ..Etc1Block::default()
        };
        let colors = block.decode(OPAQUE_ALPHA);
        for (k, color) in colors.iter().enumerate() {
            if block_x(k) >= 2 {
                assert_eq!(Rgba([255, 2, 2, 255]), *color);
            } else {
                assert_eq!(Rgba([2, 2, 2, 255]), *color);
            }
        }
    }

    #[test]
    fn decode_flipped_splits_rows() {
        let mut block = Etc1Block {
            r: 0x0F,
            ..Etc1Block::default()
        };
        block.set_flip(true);
        let colors = block.decode(OPAQUE_ALPHA);
        for (k, color) in colors.iter().enumerate() {
            let expected = if block_y(k) >= 2 { 255 } else { 2 };
            assert_eq!(expected, color[0]);
        }
    }

    #[test]
    fn decode_differential_negative_delta() {
        // c0 = 10, delta = -1 -> c1 = 9; scaled 82 and 74, plus 2.
        let value = (10 << 3) | 0b111;
        let mut block = Etc1Block {
            r: value,
            g: value,
            b: value,
            ..Etc1Block::default()
        };
        block.set_diff(true);
        let colors = block.decode(OPAQUE_ALPHA);
        for (k, color) in colors.iter().enumerate() {
            let expected = if block_x(k) >= 2 { 76 } else { 84 };
            assert_eq!(Rgba([expected, expected, expected, 255]), *color);
        }
    }

    #[test]
    fn decode_selectors_pick_modifiers() {
        // Every pixel uses selector 3 (-8) of table 0.
        let block = Etc1Block {
            r: 0x88,
            g: 0x88,
            b: 0x88,
            flags: 0,
            msb: 0xFFFF,
            lsb: 0xFFFF,
        };
        let colors = block.decode(OPAQUE_ALPHA);
        assert!(colors.iter().all(|c| *c == Rgba([128, 128, 128, 255])));
    }

    #[test]
    fn decode_alpha_plane_per_pixel() {
        let alpha: u64 = 0xFEDC_BA98_7654_3210;
        let colors = Etc1Block::default().decode(alpha);
        for (k, color) in colors.iter().enumerate() {
            assert_eq!(ORDER_3DS[k] as u8 * 17, color[3]);
        }
    }

    #[test]
    fn encode_solid_black_and_white_exactly() {
        for color in [[0, 0, 0, 255], [255, 255, 255, 255]] {
            let (_, block) = encode_block(&uniform(color));
            assert_eq!(uniform(color), block.decode(OPAQUE_ALPHA));
        }
    }

    #[test]
    fn encode_solid_representable_color_exactly() {
        // 17 * (2, 3, 10) + 2 is reachable with table 0.
        let color = [36, 53, 172, 255];
        let (_, block) = encode_block(&uniform(color));
        assert_eq!(uniform(color), block.decode(OPAQUE_ALPHA));
        assert_eq!(block.table0(), block.table1());
        assert!(!block.flip());
    }

    #[test]
    fn encode_solid_arbitrary_color_is_close() {
        for value in (0..=255u16).step_by(7) {
            let value = value as u8;
            let color = [value, 255 - value, value / 2, 255];
            let (_, block) = encode_block(&uniform(color));
            let decoded = block.decode(OPAQUE_ALPHA);
            for channel in 0..3 {
                let difference = (decoded[0][channel] as i32 - color[channel] as i32).abs();
                assert!(difference <= 8, "{:?} decoded as {:?}", color, decoded[0]);
            }
            assert!(decoded.iter().all(|c| *c == decoded[0]));
        }
    }

    #[test]
    fn encode_alpha_plane_nibbles() {
        let mut colors = uniform([10, 20, 30, 255]);
        for (k, color) in colors.iter_mut().enumerate() {
            color[3] = (k as u8) * 17;
        }
        let (alpha, block) = encode_block(&colors);
        let decoded = block.decode(alpha);
        for k in 0..16 {
            assert_eq!(colors[k][3], decoded[k][3]);
        }
    }

    #[test]
    fn encode_two_tone_columns_exactly() {
        let left = [36, 53, 172, 255];
        let right = [206, 19, 87, 255];
        let mut colors = uniform(left);
        for (k, color) in colors.iter_mut().enumerate() {
            if block_x(k) >= 2 {
                *color = Rgba(right);
            }
        }
        let (_, block) = encode_block(&colors);
        assert!(!block.flip());
        assert_eq!(colors, block.decode(OPAQUE_ALPHA));
    }

    #[test]
    fn encode_two_tone_rows_exactly() {
        let top = [36, 53, 172, 255];
        let bottom = [206, 19, 87, 255];
        let mut colors = uniform(top);
        for (k, color) in colors.iter_mut().enumerate() {
            if block_y(k) >= 2 {
                *color = Rgba(bottom);
            }
        }
        let (_, block) = encode_block(&colors);
        assert!(block.flip());
        assert_eq!(colors, block.decode(OPAQUE_ALPHA));
    }

    #[test]
    fn encode_is_deterministic() {
        let colors: [Rgba<u8>; 16] =
            std::array::from_fn(|k| Rgba([(k * 13) as u8, (k * 7) as u8, 200 - k as u8, 255]));
        let (alpha, block) = encode_block(&colors);
        assert_eq!((alpha, block), encode_block(&colors));
    }

    #[test]
    fn search_widens_when_near_colors_are_poor() {
        let mut pixels = vec![Rgb::new(255, 255, 0); 4];
        pixels.extend([Rgb::new(0, 0, 255); 4]);

        let mut near = Optimizer::new(&pixels, 16, MAX_ERROR);
        assert_eq!(Rgb::new(7, 7, 7), near.base_color);
        assert!(near.compute_deltas(&NEAR_DELTAS));
        assert_eq!(906_516, near.best.error);
        assert!(near.best.error > WIDEN_THRESHOLD);

        let mut widened = Optimizer::new(&pixels, 16, MAX_ERROR);
        assert!(widened.search());
        assert_eq!(817_776, widened.best.error);
        // (12, 12, 0) is five steps from the base, outside the near window.
        assert_eq!(Rgb::new(12, 12, 0), widened.best.color);
        assert_eq!(7, widened.best.table);
    }

    #[test]
    fn encode_picks_differential_mode_when_only_it_is_exact() {
        // Sub-block 0 base (22, 5, 13), sub-block 1 base (19, 4, 14), both table 2.
        let mut source = Etc1Block {
            r: 22 * 8 + 5,
            g: 5 * 8 + 7,
            b: 13 * 8 + 1,
            flags: 0,
            msb: 0xFA2F,
            lsb: 0xD71F,
        };
        source.set_diff(true);
        source.set_table0(2);
        source.set_table1(2);
        let colors = source.decode(OPAQUE_ALPHA);

        let (_, block) = encode_block(&colors);
        assert!(block.diff());
        assert!(!block.flip());
        assert_eq!(colors, block.decode(OPAQUE_ALPHA));
        // Packed as c0 * 8 + (c1 - c0) within 3 bits.
        assert_eq!((22 * 8 + 5, 5 * 8 + 7, 13 * 8 + 1), (block.r, block.g, block.b));
    }

    #[test]
    fn inverse_lookup_exact_entries() {
        let lookup = inverse_lookup();
        // Individual mode, table 0, selector 0 (+2): 36 = 17 * 2 + 2.
        assert_eq!(2, lookup[36]);
        // Clamped to zero by the -8 selector is exact for black.
        assert_eq!(0, lookup[3 * 256] >> 8);
    }
}
