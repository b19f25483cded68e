//! Triage classification: severity, impact, priority and categories

use serde::{Deserialize, Serialize};
use std::fmt;

labelled_enum! {
    /// Reporter-assessed technical magnitude of a problem
    Severity {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

impl Severity {
    pub fn score(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }
}

labelled_enum! {
    /// Organizational breadth of who is affected
    Impact {
        Individual => "Individual",
        Department => "Department",
        MultipleDepartments => "Multiple Departments",
        EntireOrganization => "Entire Organization",
    }
}

impl Impact {
    pub fn score(&self) -> u8 {
        match self {
            Self::Individual => 1,
            Self::Department => 2,
            Self::MultipleDepartments => 3,
            Self::EntireOrganization => 4,
        }
    }
}

labelled_enum! {
    /// Derived urgency ranking. Ordered from least to most urgent.
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Urgent => "Urgent",
    }
}

labelled_enum! {
    MainCategory {
        Bridgelink => "Bridgelink",
        ItSystemSupport => "IT/System Support",
        AssetRegister => "Asset Register",
        Training => "Training",
        Development => "Development",
        Uncategorized => "Uncategorized",
    }
}

impl MainCategory {
    /// Sub-taxonomy of this category; empty when it has none.
    pub fn sub_categories(&self) -> Vec<SubCategory> {
        match self {
            Self::Bridgelink => BridgelinkTopic::ALL.iter().copied().map(SubCategory::Bridgelink).collect(),
            Self::ItSystemSupport => ItSupportTopic::ALL.iter().copied().map(SubCategory::ItSystemSupport).collect(),
            Self::Training => TrainingTopic::ALL.iter().copied().map(SubCategory::Training).collect(),
            Self::AssetRegister | Self::Development | Self::Uncategorized => Vec::new(),
        }
    }

    pub fn has_sub_categories(&self) -> bool {
        matches!(self, Self::Bridgelink | Self::ItSystemSupport | Self::Training)
    }
}

labelled_enum! {
    BridgelinkTopic {
        ActivityStream => "Activity Stream",
        Admissions => "Admissions",
        BridgeLinkAccess => "BridgeLink Access",
        Accident => "Accident",
        Injury => "Injury",
        NearMiss => "Near Miss",
        Estates => "Estates",
        GroupQualityAssuranceAudit => "Group Quality Assurance Audit",
        Groups => "Groups",
        HealthAndSafetySystem => "Health and Safety System",
        Leaver => "Leaver",
        MeetingMinutes => "Meeting Minutes",
        NewStarter => "New Starter",
        OneForm => "One Form",
        Planning => "Planning",
        PurchaseOrders => "Purchase Orders",
        QualityAssurance => "Quality Assurance",
        RiskManagement => "Risk Management",
        SchoolFeedback => "School Feedback",
        SchoolQualityAssuranceAudit => "School Quality Assurance Audit",
        Services => "Services",
        StaffLowLevelConcern => "Staff Low Level Concern",
        StudentProfiles => "Student Profiles",
        SuggestionsRequests => "Suggestions/Requests",
        Understanding => "Understanding",
        WorkflowInbox => "Workflow Inbox",
    }
}

labelled_enum! {
    ItSupportTopic {
        Google => "Google",
        InternetWiFi => "Internet/WiFi",
        NetworkAndInfrastructure => "Network and Infrastructure",
        Printing => "Printing",
        Security => "Security",
        WebsiteAccess => "Website Access",
        Microsoft => "Microsoft",
        Assets => "Assets",
        FilesAndStorage => "Files and Storage",
        Helpdesk => "Helpdesk",
        HowDoI => "How Do I?",
        News => "News",
        Phones => "Phones",
    }
}

labelled_enum! {
    TrainingTopic {
        ELearningCourses => "e-Learning Courses",
        MyELearningDashboard => "My e-Learning Dashboard",
        SkillsLandingPage => "Skills Landing Page",
    }
}

/// Sub-category, tagged by the main category that owns it.
///
/// The tag makes "sub-category belongs to main category" checkable without a
/// lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubCategory {
    Bridgelink(BridgelinkTopic),
    ItSystemSupport(ItSupportTopic),
    Training(TrainingTopic),
}

impl SubCategory {
    pub fn main_category(&self) -> MainCategory {
        match self {
            Self::Bridgelink(_) => MainCategory::Bridgelink,
            Self::ItSystemSupport(_) => MainCategory::ItSystemSupport,
            Self::Training(_) => MainCategory::Training,
        }
    }

    pub fn belongs_to(&self, main: MainCategory) -> bool {
        self.main_category() == main
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bridgelink(topic) => topic.label(),
            Self::ItSystemSupport(topic) => topic.label(),
            Self::Training(topic) => topic.label(),
        }
    }

    /// Resolve a sub-category label within the sub-taxonomy of `main`.
    pub fn parse_for(main: MainCategory, label: &str) -> Option<Self> {
        match main {
            MainCategory::Bridgelink => BridgelinkTopic::from_label(label).map(Self::Bridgelink),
            MainCategory::ItSystemSupport => ItSupportTopic::from_label(label).map(Self::ItSystemSupport),
            MainCategory::Training => TrainingTopic::from_label(label).map(Self::Training),
            _ => None,
        }
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
