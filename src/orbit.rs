//! Orbit neighbourhood: which active notes circle a central note.
//!
//! Only membership and ring order are derived here. Radii, rotation and
//! placement stay with the renderer.
use log::debug;

use crate::Note;

/// Most rings an orbit is split into.
pub const MAX_ORBITS: usize = 2;
/// Capacity of the innermost ring; each further ring holds two more.
pub const NOTES_PER_ORBIT_BASE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitRing<'a> {
    /// 1 for the innermost ring
    pub level: usize,
    pub notes: Vec<&'a Note>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orbit<'a> {
    pub central: &'a Note,
    pub rings: Vec<OrbitRing<'a>>,
}

impl Orbit<'_> {
    pub fn orbiting_count(&self) -> usize {
        self.rings.iter().map(|r| r.notes.len()).sum()
    }
}

/// Builds the orbit around `central_id`.
///
/// Returns `None` when the id is unknown or the note is not active. Notes
/// sharing no tag with the centre are left out; the rest are ranked by the
/// number of shared tags, then newest first, and poured into the rings.
pub fn orbit<'a>(notes: &'a [Note], central_id: &str) -> Option<Orbit<'a>> {
    let central = notes.iter().find(|n| n.id == central_id && n.is_active())?;

    let mut neighbours: Vec<(usize, &Note)> = notes
        .iter()
        .filter(|n| n.id != central.id && n.is_active())
        .map(|n| (shared_tag_count(central, n), n))
        .filter(|(shared, _)| *shared > 0)
        .collect();
    neighbours.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| b.timestamp.cmp(&a.timestamp)));

    let mut remaining = neighbours.into_iter().map(|(_, n)| n);
    let mut rings = Vec::new();
    for i in 0..MAX_ORBITS {
        let capacity = NOTES_PER_ORBIT_BASE + i * 2;
        let ring: Vec<&Note> = remaining.by_ref().take(capacity).collect();
        if ring.is_empty() {
            break;
        }
        rings.push(OrbitRing {
            level: i + 1,
            notes: ring,
        });
    }

    let orbit = Orbit { central, rings };
    debug!(
        "Orbit around {} holds {} notes in {} rings",
        central.id,
        orbit.orbiting_count(),
        orbit.rings.len()
    );
    Some(orbit)
}

fn shared_tag_count(central: &Note, other: &Note) -> usize {
    other.tags.iter().filter(|t| central.has_tag(t)).count()
}
