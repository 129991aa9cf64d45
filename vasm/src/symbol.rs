use std::collections::HashMap;

/// Flat mapping from symbol name to its resolved 32-bit value. Labels bind
/// to an address, `.equ`/`.set` bind to a literal; both live in the same
/// table and neither may silently redefine the other.
#[derive(Default, Debug)]
pub struct SymbolTable {
    values: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Binds `name` to `value`. Fails if `name` is already bound, so a
    /// redefinition is always reported rather than silently overwritten.
    pub fn define(&mut self, name: &str, value: u32) -> Result<(), String> {
        if self.values.contains_key(name) {
            return Err(format!("Symbol '{}' already defined", name));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Entries sorted by name, for the verbose symbol-table dump.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.values.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// `[A-Za-z_.]` then `[A-Za-z0-9_.]*`.
pub fn is_valid_symbol_name(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '.');
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn redefinition_is_rejected() {
        let mut table = SymbolTable::new();
        table.define("foo", 4).unwrap();
        assert!(table.define("foo", 8).is_err());
        assert_eq!(table.get("foo"), Some(4));
    }

    #[test]
    fn valid_symbol_names() {
        assert!(is_valid_symbol_name("loop_start"));
        assert!(is_valid_symbol_name("_private"));
        assert!(is_valid_symbol_name("a.b.c"));
        assert!(!is_valid_symbol_name("1loop"));
        assert!(!is_valid_symbol_name(""));
        assert!(!is_valid_symbol_name("bad-name"));
    }

    #[test]
    fn sorted_entries_are_ordered_by_name() {
        let mut table = SymbolTable::new();
        table.define("zeta", 1).unwrap();
        table.define("alpha", 2).unwrap();
        let sorted = table.sorted();
        assert_eq!(sorted, vec![("alpha", 2), ("zeta", 1)]);
    }
}
