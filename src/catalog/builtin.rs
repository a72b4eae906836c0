use super::types::{CodeRecord, Specialty};

/// Reference ICD-10 subset shipped with the crate
pub fn builtin_records() -> Vec<CodeRecord> {
    use Specialty::*;

    vec![
        // Cardiovascular
        CodeRecord::new(
            "I25.10",
            "Atherosclerotic heart disease of native coronary artery without angina pectoris",
            Cardiovascular,
            &[
                "atherosclerotic heart disease",
                "coronary artery disease",
                "CAD",
                "heart disease",
                "coronary atherosclerosis",
            ],
        ),
        CodeRecord::new(
            "I25.9",
            "Chronic ischemic heart disease, unspecified",
            Cardiovascular,
            &[
                "ischemic heart disease",
                "chronic ischemia",
                "heart ischemia",
                "coronary ischemia",
            ],
        ),
        CodeRecord::new(
            "I10",
            "Essential (primary) hypertension",
            Cardiovascular,
            &[
                "hypertension",
                "high blood pressure",
                "elevated blood pressure",
                "HTN",
                "primary hypertension",
                "lisinopril",
            ],
        ),
        CodeRecord::new(
            "I21.9",
            "Acute myocardial infarction, unspecified",
            Cardiovascular,
            &[
                "myocardial infarction",
                "heart attack",
                "acute MI",
                "chest pain",
                "troponin",
                "elevated troponin",
            ],
        ),
        CodeRecord::new(
            "I50.9",
            "Heart failure, unspecified",
            Cardiovascular,
            &[
                "heart failure",
                "cardiac failure",
                "congestive heart failure",
                "CHF",
                "heart insufficiency",
            ],
        ),
        CodeRecord::new(
            "I82.409",
            "Acute embolism and thrombosis of unspecified deep veins of unspecified lower extremity",
            Cardiovascular,
            &["deep vein thrombosis", "DVT", "leg clot", "venous thrombosis"],
        ),
        CodeRecord::new(
            "I26.99",
            "Other pulmonary embolism without acute cor pulmonale",
            Cardiovascular,
            &["pulmonary embolism", "PE", "lung clot", "pulmonary thromboembolism"],
        ),
        // Respiratory
        CodeRecord::new(
            "J44.1",
            "Chronic obstructive pulmonary disease with acute exacerbation",
            Respiratory,
            &[
                "COPD",
                "chronic obstructive pulmonary disease",
                "emphysema",
                "chronic bronchitis",
                "obstructive lung disease",
            ],
        ),
        CodeRecord::new(
            "J45.9",
            "Asthma, unspecified",
            Respiratory,
            &[
                "asthma",
                "bronchial asthma",
                "allergic asthma",
                "asthmatic",
                "bronchospasm",
                "wheezing",
            ],
        ),
        CodeRecord::new(
            "J18.9",
            "Pneumonia, unspecified organism",
            Respiratory,
            &[
                "pneumonia",
                "lung infection",
                "pulmonary infection",
                "pneumonitis",
                "chest infection",
            ],
        ),
        CodeRecord::new(
            "J20.9",
            "Acute bronchitis, unspecified",
            Respiratory,
            &[
                "acute bronchitis",
                "bronchitis",
                "bronchial inflammation",
                "chest cold",
            ],
        ),
        // Endocrine
        CodeRecord::new(
            "E11.9",
            "Type 2 diabetes mellitus without complications",
            Endocrine,
            &[
                "diabetes",
                "type 2 diabetes",
                "diabetes mellitus",
                "T2DM",
                "adult onset diabetes",
                "non-insulin dependent diabetes",
                "metformin",
            ],
        ),
        CodeRecord::new(
            "E10.9",
            "Type 1 diabetes mellitus without complications",
            Endocrine,
            &[
                "type 1 diabetes",
                "T1DM",
                "insulin dependent diabetes",
                "juvenile diabetes",
            ],
        ),
        CodeRecord::new(
            "E78.5",
            "Hyperlipidemia, unspecified",
            Endocrine,
            &[
                "hyperlipidemia",
                "high cholesterol",
                "dyslipidemia",
                "elevated lipids",
                "hypercholesterolemia",
                "atorvastatin",
            ],
        ),
        // Gastrointestinal
        CodeRecord::new(
            "K21.9",
            "Gastro-esophageal reflux disease without esophagitis",
            Gastrointestinal,
            &[
                "GERD",
                "gastroesophageal reflux",
                "acid reflux",
                "heartburn",
                "reflux disease",
            ],
        ),
        CodeRecord::new(
            "K59.00",
            "Constipation, unspecified",
            Gastrointestinal,
            &[
                "constipation",
                "chronic constipation",
                "bowel irregularity",
                "difficult defecation",
            ],
        ),
        // Mental health
        CodeRecord::new(
            "F32.9",
            "Major depressive disorder, single episode, unspecified",
            MentalHealth,
            &[
                "depression",
                "major depression",
                "depressive disorder",
                "clinical depression",
                "major depressive episode",
                "depressed mood",
                "anhedonia",
            ],
        ),
        CodeRecord::new(
            "F41.9",
            "Anxiety disorder, unspecified",
            MentalHealth,
            &[
                "anxiety",
                "anxiety disorder",
                "generalized anxiety",
                "panic disorder",
                "anxious",
            ],
        ),
        // Musculoskeletal
        CodeRecord::new(
            "M79.3",
            "Panniculitis, unspecified",
            Musculoskeletal,
            &[
                "chronic pain",
                "musculoskeletal pain",
                "body pain",
                "widespread pain",
            ],
        ),
        CodeRecord::new(
            "M25.50",
            "Pain in unspecified joint",
            Musculoskeletal,
            &["joint pain", "arthralgia", "joint ache", "articular pain"],
        ),
        // Neurological
        CodeRecord::new(
            "G43.909",
            "Migraine, unspecified, not intractable, without status migrainosus",
            Neurological,
            &[
                "migraine",
                "headache",
                "severe headache",
                "migrainous headache",
                "photophobia",
            ],
        ),
        CodeRecord::new(
            "R51",
            "Headache",
            Neurological,
            &["headache", "cephalgia", "head pain"],
        ),
        // Renal and genitourinary
        CodeRecord::new(
            "N18.9",
            "Chronic kidney disease, unspecified",
            Renal,
            &[
                "chronic kidney disease",
                "CKD",
                "renal insufficiency",
                "kidney failure",
            ],
        ),
        CodeRecord::new(
            "N39.0",
            "Urinary tract infection, site not specified",
            Genitourinary,
            &["urinary tract infection", "UTI", "bladder infection", "dysuria"],
        ),
    ]
}
