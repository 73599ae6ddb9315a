//! Built-in keyword categories, in priority order.

/// `(name, keywords, replies)` for each built-in category.
pub(super) const CATEGORIES: &[(&str, &[&str], &[&str])] = &[
    (
        "greeting",
        &[
            "hello",
            "hi",
            "hey",
            "good morning",
            "good afternoon",
            "good evening",
        ],
        &[
            "Hello! How can I help you today?",
            "Hi there! What can I assist you with?",
            "Hey! I'm here to help. What do you need?",
            "Good to see you! How may I assist you?",
        ],
    ),
    (
        "help",
        &["help", "support", "assist", "how to", "what is"],
        &[
            "I'm here to help! What specific question do you have?",
            "I'd be happy to assist you. Could you tell me more about what you need help with?",
            "Sure! I can help with various topics. What would you like to know?",
            "I'm ready to help! Please describe what you need assistance with.",
        ],
    ),
    (
        "job",
        &[
            "job",
            "application",
            "apply",
            "career",
            "work",
            "employment",
        ],
        &[
            "I can help you with job applications and career guidance. What specific aspect would you like to know about?",
            "Great! I can assist with job-related questions. Are you looking for help with applications, interviews, or career advice?",
            "I'm here to help with your job search! What would you like to know about applications or career opportunities?",
            "I can provide guidance on jobs and applications. What specific help do you need?",
        ],
    ),
    (
        "profile",
        &[
            "profile",
            "account",
            "settings",
            "edit profile",
            "view profile",
        ],
        &[
            "I can help you with profile management. You can edit your profile or view it from the sidebar menu.",
            "For profile-related tasks, you can use the 'Edit Profile' or 'View Profile' options in the sidebar.",
            "I can guide you through profile settings. What specific profile information do you need help with?",
            "Profile management is available through the sidebar. What would you like to do with your profile?",
        ],
    ),
    (
        "payment",
        &["payment", "billing", "subscription", "premium", "upgrade"],
        &[
            "I can help with payment and billing questions. What specific payment issue do you have?",
            "For payment-related inquiries, you can access the Payment section in the sidebar. What do you need help with?",
            "I'm here to assist with payment questions. What billing or subscription help do you need?",
            "I can help with payment and premium features. What would you like to know about?",
        ],
    ),
    (
        "guidelines",
        &["guidelines", "rules", "policy", "terms", "how to use"],
        &[
            "I can help explain our guidelines and policies. What specific guideline are you looking for?",
            "You can find detailed guidelines in the 'Guidelines' section of the sidebar. What specific question do you have?",
            "I'm here to help with guidelines and policies. What would you like to know about our rules?",
            "I can provide information about our guidelines. What specific policy question do you have?",
        ],
    ),
    (
        "thanks",
        &["thank", "thanks", "appreciate", "grateful"],
        &[
            "You're very welcome! I'm happy to help.",
            "My pleasure! Is there anything else I can assist you with?",
            "You're welcome! Feel free to ask if you need more help.",
            "Glad I could help! Let me know if you have other questions.",
        ],
    ),
    (
        "goodbye",
        &["bye", "goodbye", "see you", "farewell", "exit"],
        &[
            "Goodbye! Have a great day!",
            "See you later! Feel free to come back anytime.",
            "Take care! I'll be here when you need help.",
            "Goodbye! Thanks for chatting with me.",
        ],
    ),
];

/// Replies used when no category matches.
pub(super) const FALLBACK: &[&str] = &[
    "I'm not sure I understand. Could you rephrase your question?",
    "That's interesting! Could you provide more details so I can help you better?",
    "I'd like to help you with that. Could you explain a bit more?",
    "I'm here to assist you. Could you clarify what you need help with?",
    "I want to make sure I understand correctly. Could you elaborate on that?",
    "That's a good question! Could you provide more context so I can give you the best answer?",
];
