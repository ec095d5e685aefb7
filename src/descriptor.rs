// Class, method, and field descriptors
//
// Plain data supplied by the embedder's EngineSession; resolution
// never talks to the target directly, only to these snapshots

use serde::{Deserialize, Serialize};

pub type ThreadId = u64;

/// What kind of reference type a descriptor names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    Class,
    Interface,
    Array,
}

/// Snapshot of one loaded reference type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub kind: ReferenceKind,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
}

/// Field information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
}

/// Method information, with its line table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// Fully qualified parameter type names, e.g. "int", "java.lang.String[]"
    pub argument_type_names: Vec<String>,
    /// Declared variable-arity (last parameter is T... in source)
    pub is_varargs: bool,
    /// Source line to code index mapping; empty for native/abstract methods
    pub line_locations: Vec<LineLocation>,
}

/// Line table entry - maps a source line to a code index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineLocation {
    pub line: u32,
    pub code_index: u64,
}

/// A code position inside a loaded class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub class_name: String,
    /// Enclosing method name; None when the line falls outside any method
    pub method: Option<String>,
    pub line: u32,
    pub code_index: u64,
}

impl ClassDescriptor {
    /// Look up a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All methods with the given name (overloads included)
    pub fn methods_named<'a>(&'a self, name: &str) -> Vec<&'a MethodDescriptor> {
        self.methods.iter().filter(|m| m.name == name).collect()
    }

    /// All executable locations at a source line, in declaration order
    pub fn executable_locations_at_line(&self, line: u32) -> Vec<Location> {
        let mut locations = Vec::new();
        for method in &self.methods {
            for entry in &method.line_locations {
                if entry.line == line {
                    locations.push(Location {
                        class_name: self.name.clone(),
                        method: Some(method.name.clone()),
                        line: entry.line,
                        code_index: entry.code_index,
                    });
                }
            }
        }
        locations
    }
}

impl MethodDescriptor {
    /// Entry location of the method (first line table entry)
    pub fn entry_location(&self, class_name: &str) -> Option<Location> {
        self.line_locations.first().map(|entry| Location {
            class_name: class_name.to_string(),
            method: Some(self.name.clone()),
            line: entry.line,
            code_index: entry.code_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_class() -> ClassDescriptor {
        ClassDescriptor {
            name: "com.example.Foo".to_string(),
            kind: ReferenceKind::Class,
            fields: vec![FieldDescriptor {
                name: "count".to_string(),
                type_name: "int".to_string(),
            }],
            methods: vec![
                MethodDescriptor {
                    name: "run".to_string(),
                    argument_type_names: vec![],
                    is_varargs: false,
                    line_locations: vec![
                        LineLocation { line: 10, code_index: 0 },
                        LineLocation { line: 11, code_index: 4 },
                    ],
                },
                MethodDescriptor {
                    name: "run".to_string(),
                    argument_type_names: vec!["int".to_string()],
                    is_varargs: false,
                    line_locations: vec![LineLocation { line: 20, code_index: 0 }],
                },
            ],
        }
    }

    #[test]
    fn test_field_lookup() {
        let class = sample_class();
        assert!(class.field_by_name("count").is_some());
        assert!(class.field_by_name("missing").is_none());
    }

    #[test]
    fn test_methods_named_returns_all_overloads() {
        let class = sample_class();
        assert_eq!(class.methods_named("run").len(), 2);
        assert!(class.methods_named("walk").is_empty());
    }

    #[test]
    fn test_locations_at_line() {
        let class = sample_class();
        let locations = class.executable_locations_at_line(10);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].method.as_deref(), Some("run"));
        assert_eq!(locations[0].code_index, 0);
        assert!(class.executable_locations_at_line(99).is_empty());
    }

    #[test]
    fn test_entry_location() {
        let class = sample_class();
        let entry = class.methods[0].entry_location(&class.name).unwrap();
        assert_eq!(entry.line, 10);

        let native = MethodDescriptor {
            name: "native0".to_string(),
            argument_type_names: vec![],
            is_varargs: false,
            line_locations: vec![],
        };
        assert!(native.entry_location("com.example.Foo").is_none());
    }
}
