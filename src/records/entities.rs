record! {
    /// Profile of one target university
    University => "1_University" {
        univ_id: String => "Univ_ID",
        country: String => "Country",
        city: String => "City",
        name: String => "University",
        website: String => "Website",
        kind: Option<String> => "Type",
        size: Option<String> => "Size",
        campus_environment: Option<String> => "Campus Environment",
        main_language: Option<String> => "Main Language",
        other_languages: Option<String> => "Other Languages",
        year_established: Option<String> => "Year Established",
        student_population: Option<String> => "Student Population",
        faculty_student_ratio: Option<String> => "Faculty-Student Ratio",
        acceptance_rate: Option<String> => "Acceptance Rate (%)",
        ranking_qs: Option<String> => "Global Ranking (QS)",
        ranking_the: Option<String> => "Global Ranking (THE)",
        subject_ranking: Option<String> => "Subject Ranking",
        research_expenditure: Option<String> => "Research Expenditure (USD)",
        endowment: Option<String> => "Endowment (USD)",
        notable_alumni: Option<String> => "Notable Alumni",
        contact_email: Option<String> => "Official Contact Email",
        notes: String => "Notes",
    }
}

record! {
    /// A graduate program offered by a university
    Program => "2_Program" {
        prog_id: String => "Prog_ID",
        univ_id: String => "Univ_ID",
        name: String => "Program Name",
        degree_type: Option<String> => "Degree Type",
        website: Option<String> => "Program Website",
        duration_years: Option<String> => "Duration (Years)",
        mode: Option<String> => "Mode",
        credits: Option<String> => "Number of Credits",
        tuition_per_year: Option<String> => "Tuition Fee (per year)",
        currency: Option<String> => "Currency",
        focus_areas: Option<String> => "Main Areas of Focus",
        application_deadline: Option<String> => "Application Deadline",
        admission_seasons: Option<String> => "Admission Seasons",
        start_date: Option<String> => "Start Date",
        cohort_size: Option<String> => "Cohort Size",
        language_requirement: Option<String> => "Language Requirement",
        prerequisites: Option<String> => "Prerequisites",
        funding_options: Option<String> => "Funding Options",
        coordinator: Option<String> => "Program Coordinator",
        contact_email: Option<String> => "Contact Email",
        notes: String => "Notes",
    }
}

record! {
    /// A research laboratory or center
    Lab => "3_Lab-Research" {
        lab_id: String => "Lab_ID",
        univ_id: String => "Univ_ID",
        prog_id: Option<String> => "Prog_ID",
        name: String => "Laboratory / Center Name",
        department: Option<String> => "Department/Faculty",
        research_fields: Option<String> => "Research Fields",
        website: Option<String> => "Website",
        director: Option<String> => "Lab Director",
        contact_email: Option<String> => "Contact Email",
        key_researchers: Option<String> => "Key Researchers",
        location: Option<String> => "Location (Building)",
        active_projects: Option<String> => "Number of Active Projects",
        grant_funding_usd: Option<String> => "Grant Funding (USD)",
        industry_collaborations: Option<String> => "Industry Collaborations",
        facilities: Option<String> => "Facilities",
        annual_publications: Option<String> => "Annual Publications",
        student_positions: Option<String> => "Student Positions Available",
        ranking: Option<String> => "Lab Ranking (if available)",
        notes: String => "Notes",
    }
}

record! {
    /// A scholarship or funding opportunity
    Scholarship => "4_Scholarships" {
        scholarship_id: String => "Scholarship_ID",
        univ_id: String => "Univ_ID",
        prog_id: Option<String> => "Prog_ID",
        name: String => "Scholarship Name",
        funding_type: Option<String> => "Type of Funding",
        amount: Option<String> => "Amount",
        currency: Option<String> => "Currency",
        eligibility: Option<String> => "Eligibility Criteria",
        competitiveness: Option<String> => "Competitiveness",
        number_of_awards: Option<String> => "Number of Awards",
        application_deadline: Option<String> => "Application Deadline",
        notification_date: Option<String> => "Notification Date",
        disbursement_schedule: Option<String> => "Disbursement Schedule",
        renewal_conditions: Option<String> => "Renewal Conditions",
        selection_process: Option<String> => "Selection Process",
        website: Option<String> => "Scholarship Website",
        contact_person: Option<String> => "Contact Person",
        contact_email: Option<String> => "Contact Email",
        notes: String => "Notes",
    }
}

record! {
    /// Graduate admission requirements
    Admission => "5_Admission" {
        admission_id: String => "Admission_ID",
        univ_id: String => "Univ_ID",
        prog_id: Option<String> => "Prog_ID",
        minimum_gpa: Option<String> => "Minimum GPA",
        gpa_scale: Option<String> => "GPA Scale",
        required_exams: Option<String> => "Required Exams",
        minimum_scores: Option<String> => "Minimum Scores",
        test_validity_years: Option<String> => "Language Test Validity (years)",
        recommendation_letters: Option<String> => "Letters of Recommendation",
        statement_of_purpose: Option<String> => "Statement of Purpose",
        resume: Option<String> => "Resume / CV",
        interview: Option<String> => "Interview Requirement",
        research_proposal: Option<String> => "Research Proposal",
        experience: Option<String> => "Experience Required",
        portfolio: Option<String> => "Portfolio/Writing Samples",
        application_deadline: Option<String> => "Application Deadline",
        application_fee_usd: Option<String> => "Application Fee (USD)",
        rolling_admission: Option<String> => "Rolling Admission",
        other_requirements: Option<String> => "Other Requirements",
        notes: String => "Notes",
    }
}

record! {
    /// Living costs and practicalities for a university's city
    CostOfLiving => "6_Cost of Living" {
        cost_id: String => "Cost_ID",
        univ_id: String => "Univ_ID",
        city: String => "City",
        country: String => "Country",
        currency: Option<String> => "Currency",
        monthly_estimate: Option<String> => "Estimated Monthly Living Costs",
        housing_type: Option<String> => "Housing Type",
        housing_costs: Option<String> => "Housing Costs",
        food: Option<String> => "Food/Groceries",
        transportation: Option<String> => "Public Transportation",
        utilities: Option<String> => "Utilities",
        health_insurance: Option<String> => "Health Insurance",
        textbooks: Option<String> => "Textbooks & Supplies",
        climate: Option<String> => "Climate",
        safety_rating: Option<String> => "Safety Rating",
        part_time_work: Option<String> => "Part-time Work Opportunities",
        visa_cost: Option<String> => "Visa Cost",
        visa_process: Option<String> => "Visa Process",
        student_services: Option<String> => "Student Services",
        notes: String => "Notes",
    }
}

record! {
    /// Graduate employment and alumni outcomes
    Outcome => "7_Outcomes" {
        outcome_id: String => "Outcome_ID",
        univ_id: String => "Univ_ID",
        prog_id: Option<String> => "Prog_ID",
        employability_rate: Option<String> => "Employability Rate (%)",
        starting_salary: Option<String> => "Average Starting Salary",
        currency: Option<String> => "Currency",
        months_to_first_job: Option<String> => "Time to First Job (months)",
        top_employers: Option<String> => "Top Employers",
        internships: Option<String> => "Internship Opportunities",
        industry_partnerships: Option<String> => "Industry Partnerships",
        alumni_network_size: Option<String> => "Alumni Network Size",
        alumni_events: Option<String> => "Alumni Events",
        mentorship: Option<String> => "Alumni Mentorship Programs",
        further_study_rate: Option<String> => "Further Study Rate (%)",
        job_satisfaction: Option<String> => "Job Satisfaction (1-5)",
        career_services: Option<String> => "Career Support Services",
        visa_extension: Option<String> => "Visa Extension Options",
        notes: String => "Notes",
    }
}

record! {
    /// Personal notes, left empty for manual completion
    Notes => "8_Notes" {
        notes_id: String => "Notes_ID",
        univ_id: String => "Univ_ID",
        prog_id: String => "Prog_ID",
        interest_level: String => "Personal Interest Level",
        career_alignment: String => "Alignment with Career Goals",
        cultural_fit: String => "Cultural Fit",
        family_nearby: String => "Family/Friends Nearby",
        comments: String => "Personal Comments",
        last_review: String => "Date of Last Review",
        next_steps: String => "Next Steps",
        final_decision: String => "Final Decision",
    }
}

record! {
    /// Application timeline, left mostly empty for manual completion
    Timeline => "9_Timeline" {
        timeline_id: String => "Timeline_ID",
        univ_id: String => "Univ_ID",
        prog_id: String => "Prog_ID",
        program_name: String => "Program Name",
        university: String => "University",
        program_deadline: String => "Program Deadline",
        application_start: String => "Application Start Date",
        document_preparation: String => "Document Preparation",
        test_dates: String => "Test Date(s)",
        recommendation_deadline: String => "Letter of Rec Deadline",
        scholarship_deadline: String => "Scholarship Deadline",
        expected_response: String => "Expected Response Date",
        deposit_due: String => "Deposit Due Date",
        visa_application: String => "Visa Application Date",
        housing_application: String => "Housing Application",
        orientation: String => "Orientation Date",
        program_start: String => "Program Start Date",
        status: String => "Status",
        priority: String => "Priority",
        notes: String => "Notes",
    }
}
