use super::domain::{Department, InstitutionCategory};

/// Static mapping from institution category to the departments eligible for
/// SAR applications.
#[derive(Debug)]
pub struct DepartmentCatalog {
    departments: Vec<Department>,
}

impl DepartmentCatalog {
    pub fn standard() -> Self {
        Self {
            departments: standard_departments(),
        }
    }

    /// Ordered departments configured for `category`. Empty for categories
    /// with no configured departments yet, never an error.
    pub fn departments_for(&self, category: InstitutionCategory) -> Vec<&Department> {
        self.departments
            .iter()
            .filter(|department| department.category == category)
            .collect()
    }

    pub fn find(&self, category: InstitutionCategory, id: &str) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.category == category && department.id == id)
    }
}

fn standard_departments() -> Vec<Department> {
    use InstitutionCategory::*;

    vec![
        Department {
            id: "cse",
            name: "Computer Science Engineering",
            short_code: "CSE",
            category: Engineering,
        },
        Department {
            id: "ece",
            name: "Electronics and Communication Engineering",
            short_code: "ECE",
            category: Engineering,
        },
        Department {
            id: "mech",
            name: "Mechanical Engineering",
            short_code: "MECH",
            category: Engineering,
        },
        Department {
            id: "civil",
            name: "Civil Engineering",
            short_code: "CIVIL",
            category: Engineering,
        },
        Department {
            id: "eee",
            name: "Electrical Engineering",
            short_code: "EEE",
            category: Engineering,
        },
        Department {
            id: "it",
            name: "Information Technology",
            short_code: "IT",
            category: Engineering,
        },
        Department {
            id: "chem",
            name: "Chemical Engineering",
            short_code: "CHEM",
            category: Engineering,
        },
        Department {
            id: "biotech",
            name: "Biotechnology",
            short_code: "BT",
            category: Engineering,
        },
        Department {
            id: "mba",
            name: "Master of Business Administration",
            short_code: "MBA",
            category: Mba,
        },
        Department {
            id: "medicine",
            name: "General Medicine",
            short_code: "MED",
            category: Medical,
        },
        Department {
            id: "physics",
            name: "Physics",
            short_code: "PHY",
            category: ArtsAndScience,
        },
        Department {
            id: "chemistry",
            name: "Chemistry",
            short_code: "CHE",
            category: ArtsAndScience,
        },
        Department {
            id: "mathematics",
            name: "Mathematics",
            short_code: "MAT",
            category: ArtsAndScience,
        },
        Department {
            id: "pharmacy",
            name: "Pharmacy",
            short_code: "PHARM",
            category: Pharmacy,
        },
        Department {
            id: "architecture",
            name: "Architecture",
            short_code: "ARCH",
            category: Architecture,
        },
        Department {
            id: "mca",
            name: "Master of Computer Applications",
            short_code: "MCA",
            category: Mca,
        },
        Department {
            id: "hospitality",
            name: "Hospitality & Tourism Management",
            short_code: "HTM",
            category: HospitalityAndTourism,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engineering_departments_are_ordered_and_complete() {
        let catalog = DepartmentCatalog::standard();
        let departments = catalog.departments_for(InstitutionCategory::Engineering);
        let ids: Vec<&str> = departments.iter().map(|d| d.id).collect();
        assert_eq!(
            ids,
            ["cse", "ece", "mech", "civil", "eee", "it", "chem", "biotech"]
        );
    }

    #[test]
    fn lookup_is_scoped_to_category() {
        let catalog = DepartmentCatalog::standard();
        assert!(catalog.find(InstitutionCategory::Engineering, "cse").is_some());
        assert!(catalog.find(InstitutionCategory::Medical, "cse").is_none());
    }

    #[test]
    fn every_category_resolves_without_error() {
        let catalog = DepartmentCatalog::standard();
        for category in InstitutionCategory::ordered() {
            // May be empty, must never fail.
            let _ = catalog.departments_for(category);
        }
    }
}
