use std::collections::HashMap;

/// Runtime signal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
}

/// One cycle's sample of every monitored signal, keyed by name.
/// Built by the signal source, then handed to the driver and only read.
#[derive(Debug, Clone)]
pub struct Snapshot {
    cycle: u64,
    values: HashMap<String, Value>,
}

impl Snapshot {
    pub fn new(cycle: u64) -> Self {
        Self { cycle, values: HashMap::new() }
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set(name, Value::Bool(value));
    }

    pub fn set_int(&mut self, name: &str, value: i64) {
        self.set(name, Value::Int(value));
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        self.values.get(name).copied()
    }
}
