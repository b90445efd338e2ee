use crate::models::candidate::CandidateData;

const PERSONAL_FIELD_WEIGHT: u32 = 8;
const EXPERIENCE_WEIGHT: u32 = 20;
const EDUCATION_WEIGHT: u32 = 15;
const SKILLS_WEIGHT: u32 = 15;
const BEHAVIORAL_WEIGHT: u32 = 10;

/// Weighted profile completion, 0..=100.
///
/// Personal data is worth 40 (five fields at 8 each), any experience 20, any
/// education entry 15, any skill 15 and a behavioral analysis 10. A category is
/// either fully satisfied or contributes nothing.
pub fn calculate_profile_completion(data: &CandidateData) -> u8 {
    let personal = &data.personal;
    let personal_fields = [
        &personal.full_name,
        &personal.birth_date,
        &personal.cpf,
        &personal.email,
        &personal.phone,
    ];

    let mut completed = 0;
    let mut total = 0;

    for field in personal_fields {
        total += PERSONAL_FIELD_WEIGHT;
        if !field.trim().is_empty() {
            completed += PERSONAL_FIELD_WEIGHT;
        }
    }

    let categories = [
        (EXPERIENCE_WEIGHT, !data.experiences.is_empty()),
        (EDUCATION_WEIGHT, !data.education.is_empty()),
        (SKILLS_WEIGHT, !data.skills.is_empty()),
        (BEHAVIORAL_WEIGHT, data.behavioral_analysis.is_some()),
    ];
    for (weight, satisfied) in categories {
        total += weight;
        if satisfied {
            completed += weight;
        }
    }

    ((completed as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::behavioral::BehavioralAnalysis;
    use crate::models::candidate::{
        CandidateEducation, CandidateExperience, CandidatePersonalData, CandidateSkills,
    };

    fn full_personal() -> CandidatePersonalData {
        CandidatePersonalData {
            cpf: "12345678901".into(),
            full_name: "Maria Souza".into(),
            birth_date: "1990-04-12".into(),
            email: "maria@example.com".into(),
            phone: "11999990000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_record_is_zero() {
        assert_eq!(calculate_profile_completion(&CandidateData::default()), 0);
    }

    #[test]
    fn complete_record_is_hundred() {
        let data = CandidateData {
            personal: full_personal(),
            experiences: vec![CandidateExperience {
                id: "1".into(),
                title: "Dev".into(),
                ..Default::default()
            }],
            education: vec![CandidateEducation {
                id: "2".into(),
                degree: "BSc".into(),
                ..Default::default()
            }],
            skills: CandidateSkills {
                technical: vec![],
                soft: vec!["Comunicação".into()],
            },
            behavioral_analysis: Some(BehavioralAnalysis::default()),
            ..Default::default()
        };
        assert_eq!(calculate_profile_completion(&data), 100);
    }

    #[test]
    fn personal_only_is_forty() {
        let data = CandidateData::empty(full_personal());
        assert_eq!(calculate_profile_completion(&data), 40);
    }

    #[test]
    fn whitespace_fields_do_not_count() {
        let mut personal = full_personal();
        personal.phone = "   ".into();
        let data = CandidateData {
            personal,
            experiences: vec![CandidateExperience::default()],
            ..Default::default()
        };
        assert_eq!(calculate_profile_completion(&data), 52);
    }
}
