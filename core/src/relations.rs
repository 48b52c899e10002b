//! Relational derivation and line transformations.

use hexaprofile_types::{ArchetypeId, Dimension, LinePosition, TraitVector};
use serde::Serialize;

use crate::reference::ReferenceData;

/// Archetypes structurally related to one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationalSet {
    pub archetype: ArchetypeId,
    /// Every line inverted.
    pub complement: ArchetypeId,
    /// Line order reversed.
    pub inverse: ArchetypeId,
    /// Mirrored slot in the antipodal palace.
    pub opposite: ArchetypeId,
    /// Inner figure built from lines 2–4 and 3–5.
    pub nuclear: ArchetypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineTransformation {
    pub archetype: ArchetypeId,
    /// Flipped lines, bottom first.
    pub changing_lines: Vec<LinePosition>,
    pub resulting: ArchetypeId,
}

impl LineTransformation {
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.changing_lines.is_empty()
    }
}

#[must_use]
pub fn derive_relations(reference: &ReferenceData, id: ArchetypeId) -> RelationalSet {
    let archetype = reference.archetype(id);
    let lines = archetype.lines();
    let opposite = reference
        .palace(archetype.palace().antipode())
        .at(archetype.position().antipode());
    RelationalSet {
        archetype: id,
        complement: reference.by_lines(lines.complement()).id(),
        inverse: reference.by_lines(lines.reversed()).id(),
        opposite,
        nuclear: reference.by_lines(lines.nuclear()).id(),
    }
}

/// Lines whose sub-score strays from the vector mean by more than `threshold`.
///
/// Line `k` reads the score of dimension `k - 1`.
#[must_use]
pub fn changing_lines(scores: &TraitVector, threshold: f64) -> Vec<LinePosition> {
    let mean = scores.mean();
    LinePosition::all()
        .filter(|line| {
            Dimension::from_index(line.index())
                .is_some_and(|dimension| (scores.score(dimension) - mean).abs() > threshold)
        })
        .collect()
}

#[must_use]
pub fn derive_line_transformation(
    reference: &ReferenceData,
    id: ArchetypeId,
    scores: &TraitVector,
    threshold: f64,
) -> LineTransformation {
    flip_lines(reference, id, changing_lines(scores, threshold))
}

/// Flip a single externally chosen line.
#[must_use]
pub fn transform_line(
    reference: &ReferenceData,
    id: ArchetypeId,
    line: LinePosition,
) -> LineTransformation {
    flip_lines(reference, id, vec![line])
}

fn flip_lines(
    reference: &ReferenceData,
    id: ArchetypeId,
    changing_lines: Vec<LinePosition>,
) -> LineTransformation {
    let lines = changing_lines
        .iter()
        .fold(reference.archetype(id).lines(), |lines, line| lines.flip(*line));
    LineTransformation {
        archetype: id,
        resulting: reference.by_lines(lines).id(),
        changing_lines,
    }
}

#[cfg(test)]
mod tests {
    use hexaprofile_types::{ArchetypeId, LinePosition, TraitVector};

    use super::{changing_lines, derive_line_transformation, derive_relations, transform_line};
    use crate::reference::ReferenceData;

    fn id(n: u32) -> ArchetypeId {
        ArchetypeId::try_new(n).unwrap()
    }

    fn line(n: u32) -> LinePosition {
        LinePosition::try_new(n).unwrap()
    }

    fn reference() -> ReferenceData {
        ReferenceData::builtin().unwrap()
    }

    #[test]
    fn known_relations() {
        let data = reference();
        let set = derive_relations(&data, id(3));
        assert_eq!(
            (set.complement.get(), set.inverse.get(), set.nuclear.get()),
            (50, 4, 23)
        );
        let set = derive_relations(&data, id(11));
        assert_eq!((set.complement.get(), set.inverse.get()), (12, 12));
        let set = derive_relations(&data, id(63));
        assert_eq!(
            (set.complement.get(), set.inverse.get(), set.nuclear.get()),
            (64, 64, 64)
        );
        let set = derive_relations(&data, id(1));
        assert_eq!(
            (set.complement.get(), set.inverse.get(), set.nuclear.get()),
            (2, 1, 1)
        );
    }

    #[test]
    fn opposite_mirrors_palace_and_position() {
        let data = reference();
        assert_eq!(derive_relations(&data, id(1)).opposite, id(64));
        assert_eq!(derive_relations(&data, id(2)).opposite, id(63));
        assert_eq!(derive_relations(&data, id(20)).opposite, id(45));
    }

    #[test]
    fn relations_are_involutions() {
        let data = reference();
        for archetype in ArchetypeId::all() {
            let set = derive_relations(&data, archetype);
            assert_eq!(derive_relations(&data, set.complement).complement, archetype);
            assert_eq!(derive_relations(&data, set.inverse).inverse, archetype);
            assert_eq!(derive_relations(&data, set.opposite).opposite, archetype);
            assert_ne!(set.complement, archetype);
        }
    }

    #[test]
    fn flat_scores_have_no_changing_lines() {
        let data = reference();
        let result = derive_line_transformation(&data, id(5), &TraitVector::neutral(), 20.0);
        assert!(result.is_stable());
        assert_eq!(result.resulting, id(5));
    }

    #[test]
    fn outlying_scores_change_lines() {
        // mean = 50; line 1 (+40) and line 4 (-30) exceed 20, line 2 (+20) does not
        let scores = TraitVector::new([90.0, 70.0, 50.0, 20.0, 50.0, 50.0, 50.0, 20.0]).unwrap();
        assert_eq!(changing_lines(&scores, 20.0), vec![line(1), line(4)]);
        assert_eq!(changing_lines(&scores, 50.0), Vec::<LinePosition>::new());
    }

    #[test]
    fn changing_lines_flip_the_composition() {
        let data = reference();
        let scores = TraitVector::new([90.0, 70.0, 50.0, 20.0, 50.0, 50.0, 50.0, 20.0]).unwrap();
        // The Creative with lines 1 and 4 broken: Wind over Wind.
        let result = derive_line_transformation(&data, id(1), &scores, 20.0);
        assert_eq!(result.changing_lines, vec![line(1), line(4)]);
        assert_eq!(result.resulting, id(57));
    }

    #[test]
    fn single_line_transformation() {
        let data = reference();
        // The Creative, bottom line broken: Coming to Meet.
        let result = transform_line(&data, id(1), line(1));
        assert_eq!(result.resulting, id(44));
        assert_eq!(result.changing_lines, vec![line(1)]);
        // The Receptive, bottom line solid: Return.
        assert_eq!(transform_line(&data, id(2), line(1)).resulting, id(24));
    }
}
