mod diagnosis_record;

pub use diagnosis_record::DiagnosisRecordRepository;
