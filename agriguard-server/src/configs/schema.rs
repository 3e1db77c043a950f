use crate::models::{DiagnosisRecordTable, Table};

pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(mut tables: Vec<Box<dyn Table>>) -> Self {
        Self::sort_tables(&mut tables);
        Self { tables }
    }

    /// Orders tables so that every table comes after the tables it depends on.
    fn sort_tables(tables: &mut Vec<Box<dyn Table>>) {
        let mut to_sort = std::mem::take(tables);
        let mut deps_list: Vec<_> = to_sort.iter().map(|t| t.dependencies()).collect();
        let mut sorted = Vec::with_capacity(to_sort.len());

        while !to_sort.is_empty() {
            let independent_indices: Vec<usize> = deps_list
                .iter()
                .enumerate()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(i, _)| i)
                .collect();

            assert!(
                !independent_indices.is_empty(),
                "Circular dependency detected or unresolved dependencies exist."
            );

            for &index in independent_indices.iter().rev() {
                sorted.push(to_sort.swap_remove(index));
                deps_list.swap_remove(index);
            }

            for deps in deps_list.iter_mut() {
                deps.retain(|dep_name| !sorted.iter().any(|table| table.name() == *dep_name));
            }
        }

        *tables = sorted;
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![Box::new(DiagnosisRecordTable)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTable {
        name: &'static str,
        dependencies: Vec<&'static str>,
    }

    impl Table for MockTable {
        fn name(&self) -> &'static str {
            self.name
        }

        fn create(&self) -> String {
            format!("CREATE TABLE {};", self.name)
        }

        fn dispose(&self) -> String {
            format!("DROP TABLE {};", self.name)
        }

        fn dependencies(&self) -> Vec<&'static str> {
            self.dependencies.clone()
        }
    }

    fn table(name: &'static str, dependencies: Vec<&'static str>) -> Box<dyn Table> {
        Box::new(MockTable { name, dependencies })
    }

    #[test]
    fn test_dependencies_are_created_first() {
        let manager = SchemaManager::new(vec![
            table("treatments", vec!["diagnosis_records", "crops"]),
            table("diagnosis_records", vec!["crops"]),
            table("crops", vec![]),
        ]);

        assert_eq!(
            manager.create_schema(),
            vec![
                "CREATE TABLE crops;",
                "CREATE TABLE diagnosis_records;",
                "CREATE TABLE treatments;",
            ]
        );
        assert_eq!(manager.dispose_schema()[0], "DROP TABLE treatments;");
    }

    #[test]
    #[should_panic(expected = "Circular dependency")]
    fn test_circular_dependency_panics() {
        SchemaManager::new(vec![table("a", vec!["b"]), table("b", vec!["a"])]);
    }

    #[test]
    fn test_default_schema_contains_history_table() {
        let statements = SchemaManager::default().create_schema();

        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("diagnosis_records"));
    }
}
