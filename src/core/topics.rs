//! Predefined prompts: the sidebar's topic shortcuts and the problems
//! suggested on an empty conversation. Both are submitted through the same
//! path as typed text.

/// Topics offered as one-click shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsTopic {
    Kinematics,
    Dynamics,
    Energy,
    Momentum,
    Thermodynamics,
    Waves,
    Electromagnetism,
}

impl PhysicsTopic {
    pub const ALL: [PhysicsTopic; 7] = [
        PhysicsTopic::Kinematics,
        PhysicsTopic::Dynamics,
        PhysicsTopic::Energy,
        PhysicsTopic::Momentum,
        PhysicsTopic::Thermodynamics,
        PhysicsTopic::Waves,
        PhysicsTopic::Electromagnetism,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PhysicsTopic::Kinematics => "Kinematics",
            PhysicsTopic::Dynamics => "Dynamics",
            PhysicsTopic::Energy => "Energy & Work",
            PhysicsTopic::Momentum => "Momentum",
            PhysicsTopic::Thermodynamics => "Thermodynamics",
            PhysicsTopic::Waves => "Waves & Optics",
            PhysicsTopic::Electromagnetism => "Electromagnetism",
        }
    }

    /// The prompt submitted when the shortcut is chosen.
    pub fn prompt(self) -> String {
        format!("Tell me about {} in 11th grade physics.", self.label())
    }
}

pub const SUGGESTED_PROBLEMS: [&str; 4] = [
    "A car accelerates from rest at $2.5 m/s^2$ for 10 seconds. How far does it travel?",
    "Calculate the gravitational force between Earth ($6 \\times 10^{24} kg$) and a 70kg person.",
    "What is the efficiency of a heat engine that takes 500J of heat and does 150J of work?",
    "Explain the difference between transverse and longitudinal waves.",
];
