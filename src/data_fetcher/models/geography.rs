use serde::Serialize;

use super::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdminLevel {
    Admin1,
    Admin2,
}

impl AdminLevel {
    pub fn level(self) -> u8 {
        match self {
            AdminLevel::Admin1 => 1,
            AdminLevel::Admin2 => 2,
        }
    }

    /// `metadata/{subcategory}` holding rows of this level.
    pub fn metadata_subcategory(self) -> &'static str {
        match self {
            AdminLevel::Admin1 => "admin1",
            AdminLevel::Admin2 => "admin2",
        }
    }

    /// Filter field for a p-code at this level.
    pub fn code_field(self) -> &'static str {
        match self {
            AdminLevel::Admin1 => "admin1_code",
            AdminLevel::Admin2 => "admin2_code",
        }
    }

    /// Filter field for the provider-supplied free-text name at this level.
    pub fn provider_name_field(self) -> &'static str {
        match self {
            AdminLevel::Admin1 => "provider_admin1_name",
            AdminLevel::Admin2 => "provider_admin2_name",
        }
    }
}

/// An admin1 or admin2 unit, read from its metadata row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminUnit {
    pub level: AdminLevel,
    pub code: String,
    pub name: String,
    pub location_code: String,
    pub location_name: Option<String>,
    pub admin1_name: Option<String>,
}

impl AdminUnit {
    /// `None` when the row lacks a code, name or parent location code.
    pub fn from_record(level: AdminLevel, record: &Record) -> Option<Self> {
        Some(Self {
            level,
            code: record.text("code")?,
            name: record.text("name")?,
            location_code: record.text("location_code")?,
            location_name: record.text("location_name"),
            admin1_name: record.text("admin1_name"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::RecordBuilder;

    #[test]
    fn test_field_names_per_level() {
        assert_eq!(AdminLevel::Admin1.code_field(), "admin1_code");
        assert_eq!(AdminLevel::Admin2.code_field(), "admin2_code");
        assert_eq!(AdminLevel::Admin1.provider_name_field(), "provider_admin1_name");
        assert_eq!(AdminLevel::Admin2.provider_name_field(), "provider_admin2_name");
        assert_eq!(AdminLevel::Admin2.level(), 2);
    }

    #[test]
    fn test_admin_unit_from_record() {
        let row = RecordBuilder::new()
            .field("code", "AF0101")
            .field("name", "Kabul")
            .field("location_code", "AFG")
            .field("location_name", "Afghanistan")
            .field("admin1_name", "Kabul Province")
            .build();
        let unit = AdminUnit::from_record(AdminLevel::Admin2, &row).unwrap();
        assert_eq!(unit.code, "AF0101");
        assert_eq!(unit.location_code, "AFG");
        assert_eq!(unit.admin1_name.as_deref(), Some("Kabul Province"));

        let incomplete = RecordBuilder::new().field("code", "AF01").build();
        assert!(AdminUnit::from_record(AdminLevel::Admin1, &incomplete).is_none());
    }
}
