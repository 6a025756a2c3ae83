use super::PolynomialTerm;
use crate::direction::Direction;

/// Sobel-like starting polynomial for a direction on a 3×3 neighbourhood.
///
/// The forward side contributes `2·x_p + x_a + x_b + x_a·x_b`, where `p` is
/// the neighbour one step along the direction and `a`, `b` flank it; the
/// backward side contributes the same with negated coefficients. The
/// coefficients sum to zero, so flat windows respond with 0 even before
/// flat-reference normalisation. Intended as a baseline to calibrate
/// against reference masks, not as fixed constants.
pub fn default_terms(direction: Direction) -> Vec<PolynomialTerm> {
    let (sx, sy) = direction.step();
    let (a, b) = if sx == 0 || sy == 0 {
        // Axis-aligned: flank with the perpendicular neighbours of the step.
        let (px, py) = (-sy, sx);
        ([sx + px, sy + py], [sx - px, sy - py])
    } else {
        // Diagonal: flank with the step's axis components.
        ([sx, 0], [0, sy])
    };
    let p = [sx, sy];

    let mut terms = side_terms(1.0, p, a, b);
    terms.extend(side_terms(-1.0, neg(p), neg(a), neg(b)));
    terms
}

fn side_terms(sign: f32, p: [i32; 2], a: [i32; 2], b: [i32; 2]) -> Vec<PolynomialTerm> {
    vec![
        PolynomialTerm::new(2.0 * sign, [p]),
        PolynomialTerm::new(sign, [a]),
        PolynomialTerm::new(sign, [b]),
        PolynomialTerm::new(sign, [a, b]),
    ]
}

#[inline]
fn neg(o: [i32; 2]) -> [i32; 2] {
    [-o[0], -o[1]]
}
