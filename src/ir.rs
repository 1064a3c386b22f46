use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Person identifiers are integers; negative values are synthetic ids for
/// "unknown" placeholder persons created while filling the ancestor window.
pub type PersonId = i64;

pub const FATHER: usize = 0;
pub const MOTHER: usize = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown root person {0}")]
    InvalidRoot(PersonId),
    #[error("generation count must be non-negative, got {0}")]
    InvalidGenerations(i32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub sourced: bool,
}

#[derive(Debug, Clone)]
pub struct Person {
    pub id: PersonId,
    pub given_name: String,
    pub surname: String,
    pub sex: Sex,
    pub birth: Option<EventSummary>,
    pub death: Option<EventSummary>,
    /// Marriage of this person's two parents; drawn on the link joining them.
    pub marriage: Option<EventSummary>,
    /// Generations above (positive) or below (negative) the root; root is 0.
    pub generation: i32,
    /// Sosa-Stradonitz number for ancestors (root = 1, father = 2n,
    /// mother = 2n+1). Descendants get a sequential negative counter instead.
    pub sosa: i64,
    /// `[father, mother]`; `None` means the slot is not recorded.
    pub parents: [Option<PersonId>; 2],
    pub children: Vec<PersonId>,
}

impl Person {
    pub fn is_placeholder(&self) -> bool {
        self.id < 0
    }

    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.given_name, self.surname);
        let name = name.trim();
        if name.is_empty() {
            "?".to_string()
        } else {
            name.to_string()
        }
    }
}

/// One person record as delivered by the data collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub birth: Option<EventSummary>,
    #[serde(default)]
    pub death: Option<EventSummary>,
    #[serde(default)]
    pub marriage: Option<EventSummary>,
    #[serde(default)]
    pub father: Option<PersonId>,
    #[serde(default)]
    pub mother: Option<PersonId>,
    #[serde(default)]
    pub children: Vec<PersonId>,
}

/// The already-parsed response of a `fetch(root, ancestors, descendants)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphPayload {
    pub persons: Vec<PersonRecord>,
}

/// In-memory pedigree graph for one root person.
///
/// Built incrementally: `merge_payload` upserts fetched records,
/// `annotate_window` assigns generations, Sosa numbers and placeholder
/// parents for the requested window. Growing the window extends the existing
/// annotations; switching root means building a fresh `Pedigree`.
#[derive(Debug, Clone)]
pub struct Pedigree {
    pub root: PersonId,
    pub persons: BTreeMap<PersonId, Person>,
    pub loaded_ancestors: u32,
    pub loaded_descendants: u32,
    next_placeholder: PersonId,
    next_descendant_sosa: i64,
}

impl Pedigree {
    pub fn new(root: PersonId) -> Self {
        Self {
            root,
            persons: BTreeMap::new(),
            loaded_ancestors: 0,
            loaded_descendants: 0,
            next_placeholder: -1,
            next_descendant_sosa: -1,
        }
    }

    pub fn from_payload(
        root: PersonId,
        payload: &GraphPayload,
        ancestors: u32,
        descendants: u32,
    ) -> Result<Self, LayoutError> {
        let mut pedigree = Self::new(root);
        pedigree.merge_payload(payload);
        pedigree.annotate_window(ancestors, descendants)?;
        Ok(pedigree)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    /// Upsert fetched records. Existing persons keep their annotations; new
    /// persons start unannotated until the next `annotate_window` pass.
    pub fn merge_payload(&mut self, payload: &GraphPayload) {
        for record in &payload.persons {
            let entry = self.persons.entry(record.id).or_insert(Person {
                id: record.id,
                given_name: String::new(),
                surname: String::new(),
                sex: Sex::Unknown,
                birth: None,
                death: None,
                marriage: None,
                generation: 0,
                sosa: 0,
                parents: [None, None],
                children: Vec::new(),
            });
            entry.given_name = record.given_name.clone();
            entry.surname = record.surname.clone();
            entry.sex = record.sex;
            entry.birth = record.birth.clone();
            entry.death = record.death.clone();
            entry.marriage = record.marriage.clone();
            if record.father.is_some() {
                entry.parents[FATHER] = record.father;
            }
            if record.mother.is_some() {
                entry.parents[MOTHER] = record.mother;
            }
            for child in &record.children {
                if !entry.children.contains(child) {
                    entry.children.push(*child);
                }
            }
        }
    }

    /// Assign generations, Sosa numbers and placeholder parents for the
    /// requested window. Idempotent; a larger window extends what a smaller
    /// pass already annotated.
    pub fn annotate_window(
        &mut self,
        ancestors: u32,
        descendants: u32,
    ) -> Result<(), LayoutError> {
        if !self.persons.contains_key(&self.root) {
            return Err(LayoutError::InvalidRoot(self.root));
        }

        let mut visited = HashSet::new();
        self.annotate_ancestors(self.root, 0, 1, ancestors, &mut visited);

        let mut visited = HashSet::new();
        visited.insert(self.root);
        let children = self
            .persons
            .get(&self.root)
            .map(|p| p.children.clone())
            .unwrap_or_default();
        for child in children {
            self.annotate_descendants(child, -1, descendants, &mut visited);
        }

        self.loaded_ancestors = self.loaded_ancestors.max(ancestors);
        self.loaded_descendants = self.loaded_descendants.max(descendants);
        Ok(())
    }

    fn annotate_ancestors(
        &mut self,
        id: PersonId,
        generation: i32,
        sosa: i64,
        window: u32,
        visited: &mut HashSet<PersonId>,
    ) {
        // Re-visiting a person (implex, or someone listed as their own
        // ancestor) stops here; the first path's annotations win.
        if !visited.insert(id) {
            return;
        }
        let Some(person) = self.persons.get_mut(&id) else {
            return;
        };
        person.generation = generation;
        person.sosa = sosa;
        if person.is_placeholder() || generation as u32 >= window {
            return;
        }

        let mut parent_ids = [None, None];
        for slot in [FATHER, MOTHER] {
            let existing = self.persons.get(&id).and_then(|p| p.parents[slot]);
            let parent_id = match existing {
                Some(pid) => pid,
                None => self.synthesize_placeholder(id, slot),
            };
            parent_ids[slot] = Some(parent_id);
        }
        for slot in [FATHER, MOTHER] {
            if let Some(pid) = parent_ids[slot] {
                let parent_sosa = if slot == FATHER { sosa * 2 } else { sosa * 2 + 1 };
                self.annotate_ancestors(pid, generation + 1, parent_sosa, window, visited);
            }
        }
    }

    /// Create an "unknown" parent for the given slot: next negative id, sex
    /// implied by the slot, no parents of its own.
    fn synthesize_placeholder(&mut self, child: PersonId, slot: usize) -> PersonId {
        let id = self.next_placeholder;
        self.next_placeholder -= 1;
        self.persons.insert(
            id,
            Person {
                id,
                given_name: String::new(),
                surname: String::new(),
                sex: if slot == FATHER { Sex::Male } else { Sex::Female },
                birth: None,
                death: None,
                marriage: None,
                generation: 0,
                sosa: 0,
                parents: [None, None],
                children: vec![child],
            },
        );
        if let Some(person) = self.persons.get_mut(&child) {
            person.parents[slot] = Some(id);
        }
        id
    }

    fn annotate_descendants(
        &mut self,
        id: PersonId,
        generation: i32,
        window: u32,
        visited: &mut HashSet<PersonId>,
    ) {
        if generation.unsigned_abs() > window || !visited.insert(id) {
            return;
        }
        let Some(person) = self.persons.get_mut(&id) else {
            return;
        };
        person.generation = generation;
        if person.sosa == 0 {
            person.sosa = self.next_descendant_sosa;
            self.next_descendant_sosa -= 1;
        }
        let children = self
            .persons
            .get(&id)
            .map(|p| p.children.clone())
            .unwrap_or_default();
        for child in children {
            self.annotate_descendants(child, generation - 1, window, visited);
        }
    }
}
