use super::{EncodingMode, Plane};

/// Undo the per-column first difference: every cell becomes the XOR of itself
/// and all cells above it in the same column.
pub(crate) fn unroll_columns(plane: &mut Plane) {
    for column in plane.columns_mut() {
        let mut running = 0;
        for cell in column.iter_mut() {
            running ^= *cell;
            *cell = running;
        }
    }
}

/// `secondary[i] ^= primary[i]` for every cell.
pub(crate) fn combine(primary: &Plane, secondary: &mut Plane) {
    assert_eq!(primary.len(), secondary.len(), "Plane sizes differ");

    for (target, source) in secondary.cells_mut().iter_mut().zip(primary.cells()) {
        *target ^= source;
    }
}

impl EncodingMode {
    /// Turn the two delta-coded planes into final bit-planes, in place.
    /// Both filters run before the combine step.
    pub fn reconstruct(self, primary: &mut Plane, secondary: &mut Plane) {
        if self.unrolls_secondary() {
            unroll_columns(secondary);
        }
        unroll_columns(primary);

        if self.combines() {
            combine(primary, secondary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn column(cells: &[u8]) -> Plane {
        Plane::from_cells(1, cells.len(), cells.to_vec())
    }

    #[test]
    fn unrolls_each_column_separately() {
        let mut plane = Plane::from_cells(2, 3, vec![1, 1, 0, 0, 1, 1]);
        unroll_columns(&mut plane);

        assert_eq!(plane.cells(), &[1, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn mode1_unrolls_without_combining() {
        let mut primary = column(&[1, 0, 1, 1]);
        let mut secondary = column(&[0, 1, 0, 0]);

        EncodingMode::Mode1.reconstruct(&mut primary, &mut secondary);

        assert_eq!(primary.cells(), &[1, 1, 0, 1]);
        assert_eq!(secondary.cells(), &[0, 1, 1, 1]);
    }

    #[test]
    fn mode2_leaves_secondary_deltas() {
        let mut primary = column(&[1, 0, 1, 1]);
        let mut secondary = column(&[0, 1, 0, 0]);

        EncodingMode::Mode2.reconstruct(&mut primary, &mut secondary);

        assert_eq!(primary.cells(), &[1, 1, 0, 1]);
        assert_eq!(secondary.cells(), &[1, 0, 0, 1]);
    }

    #[test]
    fn mode3_unrolls_then_combines() {
        let mut primary = column(&[1, 0, 1, 1]);
        let mut secondary = column(&[0, 1, 0, 0]);

        EncodingMode::Mode3.reconstruct(&mut primary, &mut secondary);

        assert_eq!(primary.cells(), &[1, 1, 0, 1]);
        assert_eq!(secondary.cells(), &[1, 0, 1, 0]);
    }

    #[test]
    fn empty_planes_are_untouched() {
        let mut primary = Plane::new(0, 0);
        let mut secondary = Plane::new(0, 0);

        EncodingMode::Mode3.reconstruct(&mut primary, &mut secondary);

        assert!(primary.is_empty() && secondary.is_empty());
    }

    proptest! {
        #[test]
        fn unroll_reverses_first_difference(
            bits in prop::collection::vec(0u8..=1, 1..=120),
            width in 1usize..4,
        ) {
            let height = bits.len();
            let original: Vec<u8> = bits.iter().copied().cycle().take(width * height).collect();

            let delta = original
                .chunks(height)
                .flat_map(|column| {
                    let mut previous = 0;
                    column.iter().map(move |&cell| {
                        let diff = cell ^ previous;
                        previous = cell;
                        diff
                    })
                })
                .collect();

            let mut plane = Plane::from_cells(width, height, delta);
            unroll_columns(&mut plane);

            prop_assert_eq!(plane.cells(), original.as_slice());
        }
    }
}
