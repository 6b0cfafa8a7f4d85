//! The portfolio page content.

use super::{ContentItem, PageSpec, SectionId, SectionSpec};
use crate::state::reveal::MotionVariant;
use crate::state::stagger::Stagger;

/// The full page in document order.
pub fn portfolio() -> PageSpec {
    PageSpec::new(
        "Engr. Jalal Saleem",
        vec![
            home(),
            about(),
            education(),
            skills(),
            projects(),
            experience(),
            certificates(),
            organization(),
            interests(),
            contact(),
        ],
    )
}

fn home() -> SectionSpec {
    SectionSpec::new(SectionId::Home, "Engr. Jalal Saleem")
        .items(vec![
            ContentItem::new("Electrical Engineer", ""),
            ContentItem::new("Machine Learning Engineer", ""),
            ContentItem::new("Data Analyst", ""),
            ContentItem::new("Social Media Marketer", ""),
        ])
        .item_motion(MotionVariant::hero_role())
        .stagger(Stagger::HERO_ROLES)
        .chips(["LinkedIn", "Instagram", "Facebook", "GitHub", "NPM", "Twitter"])
        .chip_stagger(Stagger::HERO_SOCIAL)
        .footer("Let's Innovate Together -> #contact")
        .reveal_on_mount()
}

fn about() -> SectionSpec {
    SectionSpec::new(SectionId::About, "About Me")
        .body(
            "I'm Engr. Jalal Saleem, a passionate student with a diverse skill set. \
             My journey in tech and design has equipped me with a unique blend of \
             analytical and creative abilities. I excel in data-driven strategies, \
             using insights to optimize campaigns and make informed decisions. As an \
             Electrical Engineering student, I have a deep understanding of complex \
             systems, which enhances my problem-solving skills. Let's innovate together!",
        )
        .chips([
            "Electrical Engineering",
            "Machine Learning",
            "Data Analysis",
            "Programming",
            "Graphic Design",
            "Social Media Marketing",
        ])
}

fn education() -> SectionSpec {
    SectionSpec::new(SectionId::Education, "Education").items(vec![
        ContentItem::new("Matriculation in Sciences", "CDG Boys High School")
            .period("Apr 2018 – Aug 2020")
            .location("Lahore, Pakistan"),
        ContentItem::new("FSc Pre Engineering", "Punjab College of Science")
            .period("Oct 2020 – Aug 2022")
            .location("Lahore, Pakistan"),
        ContentItem::new(
            "BS Electrical Engineering",
            "University of Engineering and Technology, Lahore",
        )
        .period("Jun 2022 – present")
        .location("Lahore, Pakistan"),
        ContentItem::new("Fellowship Program", "McKinsey Fellowship")
            .period("May 2024 – present")
            .location("Lahore, Pakistan"),
    ])
}

fn skills() -> SectionSpec {
    let skills: [(&str, u8); 12] = [
        ("Python", 75),
        ("C++ / C", 75),
        ("TypeScript", 60),
        ("JavaScript", 60),
        ("HTML", 75),
        ("CSS", 75),
        ("VHDL / HDL", 75),
        ("Machine Learning", 75),
        ("Power BI", 75),
        ("Data Analytics", 100),
        ("MATLAB", 40),
        ("Signal Processing", 75),
    ];

    SectionSpec::new(SectionId::Skills, "My Skills Arsenal")
        .items(
            skills
                .iter()
                .map(|(name, level)| ContentItem::new(*name, "").proficiency(*level))
                .collect(),
        )
        .stagger(Stagger::SKILLS)
        .footer("Always learning, always growing. The journey never ends.")
}

fn projects() -> SectionSpec {
    SectionSpec::new(SectionId::Projects, "My Project Portfolio")
        .items(vec![
            ContentItem::new(
                "AI-Based Fault Detection in Smart Grids",
                "Developed an AI model to predict and detect faults in smart grids using \
                 machine learning techniques.",
            ),
            ContentItem::new(
                "Smart Home Automation System",
                "Designed a home automation system that integrates various IoT devices for \
                 enhanced home security and energy management.",
            ),
            ContentItem::new(
                "ML Model For The Ranking",
                "A machine learning model that predicts a student's rank from their marks, \
                 built with pandas, numpy, plotly express and scikit-learn.",
            )
            .period("May 2023 – June 2023")
            .location("Lahore, Pakistan"),
            ContentItem::new(
                "Chat Bot Development using Google's Palm API",
                "A real-time chat bot that answers FAQs and provides information.",
            )
            .period("July 2023")
            .location("Sargodha, Pakistan"),
            ContentItem::new(
                "Weather CLI Based Application",
                "A command-line weather client in Node.js and TypeScript backed by the \
                 OpenWeatherMap API.",
            )
            .period("Jan 2024")
            .location("PIAIC, Lahore, Pakistan"),
        ])
        .item_motion(MotionVariant::spring_card())
        .stagger(Stagger::PROJECTS)
        .footer("Each project is a step forward, a challenge overcome, a lesson learned.")
}

fn experience() -> SectionSpec {
    SectionSpec::new(SectionId::Experience, "Experience").items(vec![
        ContentItem::new(
            "Social Media Manager @ JS Digital Marketer",
            "Worked on Facebook, Instagram, and X as a Social Media Manager.",
        )
        .period("Jun 2021 – Present")
        .color("#22c55e"),
        ContentItem::new(
            "Poster Designer",
            "Created social media posts, posters, banners, and thumbnails.",
        )
        .period("January 2022 – Present")
        .color("#22c55e"),
        ContentItem::new(
            "Content Creator @ XYZ Media",
            "Developed engaging content for social media platforms, increasing engagement by 30%.",
        )
        .period("Feb 2020 – May 2021")
        .color("#22c55e"),
    ])
}

fn certificates() -> SectionSpec {
    SectionSpec::new(SectionId::Certificates, "Certificates").items(vec![
        ContentItem::new(
            "Data Analyst and Business Intelligence",
            "Completed a comprehensive data analysis course using Python from DigiSkills.",
        )
        .link("https://digiskills.pk/verify/"),
        ContentItem::new("Play It Safe: Manage Security Risks", "Coursera")
            .link("https://www.coursera.org/account/accomplishments/certificate/2A4AUES7GAXD"),
        ContentItem::new("Foundations of Cybersecurity", "Coursera")
            .link("https://www.coursera.org/account/accomplishments/certificate/6AH8D7CPDTRV"),
        ContentItem::new(
            "TypeScript Variables and Data Types",
            "Declarations with var, let and const, variable scope, and TypeScript data types.",
        )
        .link("https://www.coursera.org/account/accomplishments/verify/YMN65MXM5DJC"),
    ])
}

fn organization() -> SectionSpec {
    SectionSpec::new(SectionId::Organization, "Organization").items(vec![
        ContentItem::new(
            "Vice President @ IEO",
            "Worked as a Vice President Non Technical at IEO.",
        )
        .period("May 2023 – August 2023"),
        ContentItem::new(
            "Director of Sponsorship @ IEEE",
            "Director of Sponsorship at the IEEE branch of UET Lahore New Campus.",
        )
        .period("Sep 2023 – May 2024"),
        ContentItem::new(
            "Deputy Director of Media and Publicity @ LDS",
            "Media and publicity for the Literary and Debate Society.",
        )
        .period("Sep 2023 – May 2024"),
        ContentItem::new("Volunteer @ BDS", "Worked as a Volunteer at Blood Donor Society.")
            .period("January 2023"),
    ])
}

fn interests() -> SectionSpec {
    SectionSpec::new(SectionId::Interests, "Interests").items(vec![
        ContentItem::new(
            "Technology",
            "Exploring new technologies and working on innovative projects.",
        )
        .icon("laptop-code"),
        ContentItem::new(
            "Innovation",
            "Tackling complex problems and coming up with efficient solutions.",
        )
        .icon("lightbulb"),
        ContentItem::new(
            "Project Management",
            "Leading projects and ensuring they are completed successfully.",
        )
        .icon("project-diagram"),
        ContentItem::new("Continuous Learning", "Always expanding my knowledge and skills.")
            .icon("brain"),
    ])
}

fn contact() -> SectionSpec {
    SectionSpec::new(SectionId::Contact, "Contact")
        .body("Press c to write a message: Tab moves between fields, Enter sends.")
}
