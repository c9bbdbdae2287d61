use rustc_hash::FxHashSet;

/// How node, report and plan identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdMode {
    /// `prefix_` followed by 8 hex digits of a random v4 UUID.
    #[default]
    Random,
    /// `prefix_` followed by a zero-padded counter; reproducible across runs.
    Sequential,
}

/// Per-call identifier source. Issued ids never repeat within one generator.
#[derive(Debug, Default)]
pub struct IdGenerator {
    mode: IdMode,
    next: u64,
    issued: FxHashSet<String>,
}

impl IdGenerator {
    pub fn new(mode: IdMode) -> Self {
        Self {
            mode,
            next: 0,
            issued: FxHashSet::default(),
        }
    }

    pub fn sequential() -> Self {
        Self::new(IdMode::Sequential)
    }

    pub fn mode(&self) -> IdMode {
        self.mode
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        loop {
            let candidate = match self.mode {
                IdMode::Random => {
                    let hex = uuid::Uuid::new_v4().simple().to_string();
                    format!("{prefix}_{}", &hex[..8])
                }
                IdMode::Sequential => {
                    self.next += 1;
                    format!("{prefix}_{:08}", self.next)
                }
            };
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
