use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::Path,
};

use reversion::{
    Fingerprint, Fingerprinter, Identifiable, IdentifiedKeyedDiffer, IdentifiedSequenceDiffer,
    KeyedDiffer, LeafDiffer, NestedDiffer, OptionalDiffer, Reverter, Revertible, SequenceDiffer,
    SetDiffer, field,
};
use serde::Deserialize;

/// A planning document exercising every differ: each field is registered
/// with a different strategy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Document {
    pub title: String,
    pub tags: BTreeSet<String>,
    pub tasks: Vec<Task>,
    pub metadata: HashMap<String, String>,
    pub sections: BTreeMap<String, Section>,
    pub note: Option<String>,
    pub layout: Layout,
    pub revision: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub id: u32,
    pub label: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    pub id: String,
    pub heading: String,
    #[serde(default)]
    pub words: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub columns: u8,
    pub theme: String,
}

impl Fingerprint for Document {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.title.write_fingerprint(fingerprinter);
        self.tags.write_fingerprint(fingerprinter);
        self.tasks.write_fingerprint(fingerprinter);
        self.metadata.write_fingerprint(fingerprinter);
        self.sections.write_fingerprint(fingerprinter);
        self.note.write_fingerprint(fingerprinter);
        self.layout.write_fingerprint(fingerprinter);
        self.revision.write_fingerprint(fingerprinter);
    }
}

impl Revertible for Document {
    fn describe(reverter: &mut Reverter<'_, Self>) {
        reverter
            .field(field!(Document, title), SequenceDiffer)
            .field(field!(Document, tags), SetDiffer)
            .field(field!(Document, tasks), IdentifiedSequenceDiffer)
            .field(field!(Document, metadata), KeyedDiffer)
            .field(field!(Document, sections), IdentifiedKeyedDiffer)
            .field(field!(Document, note), OptionalDiffer(SequenceDiffer))
            .field(field!(Document, layout), NestedDiffer)
            .field(field!(Document, revision), LeafDiffer);
    }
}

impl Identifiable for Task {
    type Id = u32;

    fn id(&self) -> u32 { self.id }
}

impl Fingerprint for Task {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.id.write_fingerprint(fingerprinter);
        self.label.write_fingerprint(fingerprinter);
        self.done.write_fingerprint(fingerprinter);
    }
}

impl Revertible for Task {
    fn describe(reverter: &mut Reverter<'_, Self>) {
        reverter
            .field(field!(Task, label), SequenceDiffer)
            .field(field!(Task, done), LeafDiffer);
    }
}

impl Identifiable for Section {
    type Id = String;

    fn id(&self) -> String { self.id.clone() }
}

impl Fingerprint for Section {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.id.write_fingerprint(fingerprinter);
        self.heading.write_fingerprint(fingerprinter);
        self.words.write_fingerprint(fingerprinter);
    }
}

impl Revertible for Section {
    fn describe(reverter: &mut Reverter<'_, Self>) {
        reverter
            .field(field!(Section, heading), SequenceDiffer)
            .field(field!(Section, words), LeafDiffer);
    }
}

impl Fingerprint for Layout {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.columns.write_fingerprint(fingerprinter);
        self.theme.write_fingerprint(fingerprinter);
    }
}

impl Revertible for Layout {
    fn describe(reverter: &mut Reverter<'_, Self>) {
        reverter
            .field(field!(Layout, columns), LeafDiffer)
            .field(field!(Layout, theme), LeafDiffer);
    }
}

/// `ExampleCase` is one diff scenario: the value being edited, the version
/// it should be reverted to, and the operations the reversion is expected
/// to render as, in order. An empty list means the two are equal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExampleCase {
    pub name: String,
    pub current: Document,
    pub previous: Document,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl ExampleCase {
    /// Loads every case from the YAML files in `directory`; a file may hold
    /// several documents separated by `---`.
    ///
    /// # Panics
    ///
    /// If a file cannot be read or parsed, the program will panic.
    #[must_use]
    pub fn load_all(directory: &Path) -> Vec<Self> {
        let mut paths = fs::read_dir(directory)
            .expect("Failed to read cases directory")
            .map(|entry| entry.expect("Failed to read directory entry").path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("yml"))
            .collect::<Vec<_>>();
        paths.sort();

        let mut cases = Vec::new();
        for path in paths {
            let file = fs::File::open(&path).expect("Failed to open case file");
            for document in serde_yaml::Deserializer::from_reader(file) {
                cases.push(Self::deserialize(document).expect("Failed to deserialize case"));
            }
        }

        assert!(!cases.is_empty(), "No cases found in {}", directory.display());
        cases
    }
}
