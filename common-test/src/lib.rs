use std::{
    cell::RefCell,
    collections::BTreeMap,
    env,
    error::Error,
    rc::Rc,
    sync::{OnceLock, RwLock},
};

use rand::{random, rngs::StdRng, Rng, SeedableRng};

pub const DEFAULT_TEST_SEED_ENV: &str = "DEFAULT_TEST_SEED";

static SEEDS: OnceLock<RwLock<BTreeMap<&'static str, u64>>> = OnceLock::new();

fn get_seeds_lock() -> &'static RwLock<BTreeMap<&'static str, u64>> {
    SEEDS.get_or_init(|| RwLock::new(BTreeMap::new()))
}

fn get_seed(key: &'static str) -> Result<u64, Box<dyn Error>> {
    let mut seeds = get_seeds_lock()
        .write()
        .map_err(|e| e.to_string())?;
    Ok(*seeds.entry(key).or_insert_with(|| {
        let seed = env::var(key)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or_else(random);
        println!("Using seed {seed} for {key}");
        seed
    }))
}

pub fn get_seeded_rng() -> Result<StdRng, Box<dyn Error>> {
    get_seeded_rng_from_scope(DEFAULT_TEST_SEED_ENV)
}

pub fn get_seeded_rng_from_scope(key: &'static str) -> Result<StdRng, Box<dyn Error>> {
    Ok(StdRng::seed_from_u64(get_seed(key)?))
}

/// One step of a register/unregister script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Register `key`; `tag` identifies the callback installed for it.
    Register { key: u8, tag: u32 },
    Unregister { key: u8 },
}

/// Draws `count` operations over keys in `0..key_space`.
pub fn random_operations(rng: &mut impl Rng, count: usize, key_space: u8) -> Vec<Operation> {
    (0..count as u32)
        .map(|tag| {
            let key = rng.gen_range(0..key_space.max(1));
            if rng.gen_bool(0.6) {
                Operation::Register { key, tag }
            } else {
                Operation::Unregister { key }
            }
        })
        .collect()
}

/// Upsert/delete-if-present mapping the registries are checked against.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReferenceRegistrar {
    entries: BTreeMap<u8, u32>,
}

impl ReferenceRegistrar {
    pub fn replay(operations: &[Operation]) -> Self {
        let mut reference = Self::default();
        operations.iter().for_each(|op| reference.apply(*op));
        reference
    }

    pub fn apply(&mut self, operation: Operation) {
        match operation {
            Operation::Register { key, tag } => {
                self.entries.insert(key, tag);
            }
            Operation::Unregister { key } => {
                self.entries.remove(&key);
            }
        }
    }

    pub fn keys(&self) -> Vec<u8> {
        self.entries.keys().copied().collect()
    }

    /// Tag of the callback that should answer for `key`.
    pub fn tag(&self, key: u8) -> Option<u32> {
        self.entries.get(&key).copied()
    }
}

/// Shared log of whatever callbacks under test received.
#[derive(Debug)]
pub struct Recorder<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Recorder {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Recorder {
            calls: Rc::new(RefCell::new(vec![])),
        }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: T) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}
