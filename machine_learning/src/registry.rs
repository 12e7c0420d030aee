use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    sync::OnceLock,
};

use crate::{
    MlErr, Result,
    arch::{
        loss::{CrossEntropy, Hinge, Loss, Squared},
        score::{FfmScore, FmScore, LinearScore, Score},
    },
    optimization::{AdaGrad, Adam, Momentum, Sgd, Updater},
    parsing::{CsvParser, LibffmParser, LibsvmParser, Parser},
    reading::{DiskReader, MemoryReader, Reader},
};

/// The kinds of pluggable components a registry can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Parser,
    Reader,
    Updater,
    Score,
    Loss,
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Parser => "parser",
            ComponentKind::Reader => "reader",
            ComponentKind::Updater => "updater",
            ComponentKind::Score => "score function",
            ComponentKind::Loss => "loss function",
        };

        write!(f, "{name}")
    }
}

type Factory<T> = Box<dyn Fn() -> Box<T> + Send + Sync>;

/// Named factories for one kind of component.
struct Table<T: ?Sized> {
    kind: ComponentKind,
    factories: BTreeMap<String, Factory<T>>,
}

impl<T: ?Sized> Table<T> {
    fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
        }
    }

    fn insert<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        self.factories.insert(key.to_string(), Box::new(factory));
    }

    fn unknown(&self, key: &str) -> MlErr {
        MlErr::UnknownComponent {
            kind: self.kind,
            key: key.to_string(),
            known: self.factories.keys().cloned().collect(),
        }
    }

    fn create(&self, key: &str) -> Result<Box<T>> {
        match self.factories.get(key) {
            Some(factory) => Ok(factory()),
            None => Err(self.unknown(key)),
        }
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.factories.contains_key(key) {
            Ok(())
        } else {
            Err(self.unknown(key))
        }
    }
}

/// Maps string keys to constructors of parsers, readers, updaters, scores and losses.
///
/// Every call to `create_*` yields a fresh instance, so no two holders ever
/// share mutable component state.
pub struct Registry {
    parsers: Table<dyn Parser>,
    readers: Table<dyn Reader>,
    updaters: Table<dyn Updater>,
    scores: Table<dyn Score>,
    losses: Table<dyn Loss>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    /// Creates a registry with no component registered.
    pub fn empty() -> Self {
        Self {
            parsers: Table::new(ComponentKind::Parser),
            readers: Table::new(ComponentKind::Reader),
            updaters: Table::new(ComponentKind::Updater),
            scores: Table::new(ComponentKind::Score),
            losses: Table::new(ComponentKind::Loss),
        }
    }

    /// Creates a registry holding every built-in component.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();

        registry.register_parser("libsvm", || Box::new(LibsvmParser::new()));
        registry.register_parser("libffm", || Box::new(LibffmParser::new()));
        registry.register_parser("csv", || Box::new(CsvParser::new()));

        registry.register_reader("memory", || Box::new(MemoryReader::new()));
        registry.register_reader("disk", || Box::new(DiskReader::new()));

        registry.register_updater("sgd", || Box::new(Sgd::new()));
        registry.register_updater("momentum", || Box::new(Momentum::new()));
        registry.register_updater("adagrad", || Box::new(AdaGrad::new()));
        registry.register_updater("adam", || Box::new(Adam::new()));

        registry.register_score("linear", || Box::new(LinearScore::new()));
        registry.register_score("fm", || Box::new(FmScore::new()));
        registry.register_score("ffm", || Box::new(FfmScore::new()));

        registry.register_loss("squared", || Box::new(Squared::new()));
        registry.register_loss("cross_entropy", || Box::new(CrossEntropy::new()));
        registry.register_loss("hinge", || Box::new(Hinge::new()));

        registry
    }

    /// The process-wide registry of built-in components.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::with_defaults)
    }

    pub fn register_parser<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Parser> + Send + Sync + 'static,
    {
        self.parsers.insert(key, factory);
    }

    pub fn register_reader<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Reader> + Send + Sync + 'static,
    {
        self.readers.insert(key, factory);
    }

    pub fn register_updater<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Updater> + Send + Sync + 'static,
    {
        self.updaters.insert(key, factory);
    }

    pub fn register_score<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Score> + Send + Sync + 'static,
    {
        self.scores.insert(key, factory);
    }

    pub fn register_loss<F>(&mut self, key: &str, factory: F)
    where
        F: Fn() -> Box<dyn Loss> + Send + Sync + 'static,
    {
        self.losses.insert(key, factory);
    }

    pub fn create_parser(&self, key: &str) -> Result<Box<dyn Parser>> {
        self.parsers.create(key)
    }

    pub fn create_reader(&self, key: &str) -> Result<Box<dyn Reader>> {
        self.readers.create(key)
    }

    pub fn create_updater(&self, key: &str) -> Result<Box<dyn Updater>> {
        self.updaters.create(key)
    }

    pub fn create_score(&self, key: &str) -> Result<Box<dyn Score>> {
        self.scores.create(key)
    }

    pub fn create_loss(&self, key: &str) -> Result<Box<dyn Loss>> {
        self.losses.create(key)
    }

    /// Fails with `MlErr::UnknownComponent` unless `key` names a registered
    /// component of the given kind, without constructing it.
    pub fn check(&self, kind: ComponentKind, key: &str) -> Result<()> {
        match kind {
            ComponentKind::Parser => self.parsers.check(key),
            ComponentKind::Reader => self.readers.check(key),
            ComponentKind::Updater => self.updaters.check(key),
            ComponentKind::Score => self.scores.check(key),
            ComponentKind::Loss => self.losses.check(key),
        }
    }

    /// Whether `key` names a registered component of the given kind.
    pub fn contains(&self, kind: ComponentKind, key: &str) -> bool {
        self.check(kind, key).is_ok()
    }
}
