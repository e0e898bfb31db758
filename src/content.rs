//! Built-in sample storylines in the golden-age Hollywood register.
//!
//! These double as living documentation of the authoring schema; hosts with
//! their own content can ignore this module entirely or merge on top of it.

use crate::core::catalog::{CatalogError, StorylineCatalog};
use crate::schema::condition::TriggerCondition;
use crate::schema::effect::{Effect, Value};
use crate::schema::storyline::{
    Category, ChapterDefinition, Choice, ConditionalOutcome, Modal, OutcomeBranch,
    OutcomeCondition, StorylineDefinition,
};

/// All built-in storylines, validated and in trigger-priority order.
pub fn builtin_catalog() -> Result<StorylineCatalog, CatalogError> {
    StorylineCatalog::from_definitions(vec![
        rise_of_a_star(),
        scandal_in_the_papers(),
        the_hays_code(),
    ])
}

fn blank_chapter(id: &str, name: &str) -> ChapterDefinition {
    ChapterDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        trigger_conditions: Vec::new(),
        modal: None,
        effects: Vec::new(),
        choices: Vec::new(),
        conditional_outcome: None,
        next_chapter: None,
        resolution: false,
        failure: false,
    }
}

fn modal(title: &str, body: &str) -> Option<Modal> {
    Some(Modal {
        title: title.to_string(),
        body: body.to_string(),
    })
}

fn set_var(key: &str, value: Value) -> Effect {
    Effect::SetVariable {
        key: key.to_string(),
        value,
    }
}

/// A casting discovery arc: sign the unknown, weather her temperament, and
/// either mint a star or watch a rival studio poach her.
pub fn rise_of_a_star() -> StorylineDefinition {
    let mut discovery = blank_chapter("discovery", "A Face in the Crowd");
    discovery.modal = modal(
        "A Face in the Crowd",
        "A casting director slips you a screen test of {ACTOR}, an unknown \
         with undeniable presence. Your bank balance stands at {CASH}. \
         What kind of deal do you offer?",
    );
    discovery.effects = vec![set_var("actor", Value::String("Vivien Hart".to_string()))];
    discovery.choices = vec![
        Choice {
            text: "Sign an exclusive 5-year contract".to_string(),
            cost: 25_000,
            effects: vec![
                Effect::GrantContractTerm {
                    field: "contract.years".to_string(),
                    value: Value::Int(5),
                },
                set_var("loyalty", Value::Float(0.8)),
            ],
            next_chapter: Some("rising_exclusive".to_string()),
        },
        Choice {
            text: "Offer a picture-by-picture deal".to_string(),
            cost: 5_000,
            effects: vec![
                Effect::GrantContractTerm {
                    field: "contract.years".to_string(),
                    value: Value::Int(1),
                },
                set_var("loyalty", Value::Float(0.4)),
            ],
            next_chapter: Some("rising_loose".to_string()),
        },
        Choice {
            text: "Pass on the opportunity".to_string(),
            cost: 0,
            effects: Vec::new(),
            next_chapter: Some("passed_over".to_string()),
        },
    ];

    let mut rising_exclusive = blank_chapter("rising_exclusive", "Building a Star");
    rising_exclusive.trigger_conditions =
        vec![TriggerCondition::WeeksAfterPrevious { weeks: 8 }];
    rising_exclusive.modal = modal(
        "Building a Star",
        "{ACTOR}'s first two pictures land well. The fan magazines have \
         started printing her name.",
    );
    rising_exclusive.effects = vec![Effect::AdjustReputation { amount: 5.0 }];
    rising_exclusive.conditional_outcome = Some(ConditionalOutcome {
        condition: OutcomeCondition::Variable {
            name: "loyalty".to_string(),
        },
        on_success: OutcomeBranch {
            modal: modal(
                "The Studio Player",
                "{ACTOR} re-signs her publicity schedule without complaint. \
                 The gamble is paying off.",
            ),
            effects: vec![Effect::AdjustCash { amount: 40_000 }],
            next_chapter: Some("box_office_triumph".to_string()),
        },
        on_failure: OutcomeBranch {
            modal: modal(
                "Temperament",
                "{ACTOR} has started missing call times, and the gossip \
                 columns know it.",
            ),
            effects: vec![set_var("starRisk", Value::Float(0.5))],
            next_chapter: Some("temperamental".to_string()),
        },
    });

    let mut rising_loose = blank_chapter("rising_loose", "A Loose Arrangement");
    rising_loose.trigger_conditions = vec![TriggerCondition::WeeksAfterPrevious { weeks: 8 }];
    rising_loose.modal = modal(
        "A Loose Arrangement",
        "{ACTOR} shines on loan-out after loan-out. Every studio in town has \
         noticed that her deal with you expires soon.",
    );
    rising_loose.conditional_outcome = Some(ConditionalOutcome {
        condition: OutcomeCondition::Variable {
            name: "loyalty".to_string(),
        },
        on_success: OutcomeBranch {
            next_chapter: Some("box_office_triumph".to_string()),
            ..Default::default()
        },
        on_failure: OutcomeBranch {
            next_chapter: Some("poached".to_string()),
            ..Default::default()
        },
    });

    let mut temperamental = blank_chapter("temperamental", "Handle With Care");
    temperamental.modal = modal(
        "Handle With Care",
        "Your publicity chief can bury the stories, for a price.",
    );
    temperamental.choices = vec![
        Choice {
            text: "Hire a personal publicist".to_string(),
            cost: 10_000,
            effects: vec![Effect::AdjustReputation { amount: 2.0 }],
            next_chapter: Some("box_office_triumph".to_string()),
        },
        Choice {
            text: "Let the papers print what they like".to_string(),
            cost: 0,
            effects: vec![Effect::AdjustReputation { amount: -3.0 }],
            next_chapter: Some("poached".to_string()),
        },
    ];

    let mut box_office_triumph = blank_chapter("box_office_triumph", "Marquee Gold");
    box_office_triumph.modal = modal(
        "Marquee Gold",
        "{ACTOR} carries a prestige picture to the top of the box office. \
         The studio's reputation now stands at {REPUTATION}.",
    );
    box_office_triumph.effects = vec![
        Effect::AdjustReputation { amount: 10.0 },
        Effect::UnlockAchievement {
            key: "star_maker".to_string(),
        },
    ];
    box_office_triumph.resolution = true;

    let mut poached = blank_chapter("poached", "Gone to a Rival");
    poached.modal = modal(
        "Gone to a Rival",
        "{ACTOR} signs with a rival lot. The trades call it the bargain of \
         {YEAR}.",
    );
    poached.effects = vec![
        Effect::MarkActorLost,
        Effect::AdjustReputation { amount: -5.0 },
    ];
    poached.resolution = true;
    poached.failure = true;

    let mut passed_over = blank_chapter("passed_over", "The One Who Got Away");
    passed_over.modal = modal(
        "The One Who Got Away",
        "Six months later, {ACTOR} is a headliner for someone else.",
    );
    passed_over.resolution = true;

    StorylineDefinition {
        id: "rise_of_a_star".to_string(),
        category: Category::Talent,
        name: "Rise of a Star".to_string(),
        description: "An unknown talent could become your studio's next marquee name."
            .to_string(),
        trigger_conditions: vec![TriggerCondition::ReputationRange {
            min: Some(15.0),
            max: None,
        }],
        chapters: vec![
            discovery,
            rising_exclusive,
            rising_loose,
            temperamental,
            box_office_triumph,
            poached,
            passed_over,
        ],
    }
}

/// A gossip-column scandal: pay to bury it, or ride out the headlines.
pub fn scandal_in_the_papers() -> StorylineDefinition {
    let mut whispers = blank_chapter("whispers", "Whispers on the Lot");
    whispers.modal = modal(
        "Whispers on the Lot",
        "A columnist is holding photographs from a party that got out of \
         hand. Her price is silence money; her deadline is Friday.",
    );
    whispers.effects = vec![set_var("recoveryChance", Value::Float(0.65))];
    whispers.choices = vec![
        Choice {
            text: "Buy the negatives".to_string(),
            cost: 15_000,
            effects: Vec::new(),
            next_chapter: Some("buried".to_string()),
        },
        Choice {
            text: "Let the papers run it".to_string(),
            cost: 0,
            effects: Vec::new(),
            next_chapter: Some("headline".to_string()),
        },
    ];

    let mut headline = blank_chapter("headline", "Front Page");
    headline.trigger_conditions = vec![TriggerCondition::WeeksAfterPrevious { weeks: 2 }];
    headline.modal = modal(
        "Front Page",
        "The story breaks bigger than anyone expected.",
    );
    headline.effects = vec![Effect::AdjustReputation { amount: -10.0 }];
    headline.conditional_outcome = Some(ConditionalOutcome {
        condition: OutcomeCondition::Variable {
            name: "recoveryChance".to_string(),
        },
        on_success: OutcomeBranch {
            modal: modal(
                "Yesterday's News",
                "A bigger scandal at a rival studio knocks yours off the \
                 front page.",
            ),
            effects: vec![Effect::AdjustReputation { amount: 6.0 }],
            next_chapter: Some("weathered".to_string()),
        },
        on_failure: OutcomeBranch {
            modal: modal(
                "The Story Grows Legs",
                "Exhibitors in three states cancel bookings.",
            ),
            effects: vec![Effect::AdjustReputation { amount: -5.0 }],
            next_chapter: Some("ruined".to_string()),
        },
    });

    let mut buried = blank_chapter("buried", "Quietly Handled");
    buried.trigger_conditions = vec![TriggerCondition::WeeksAfterPrevious { weeks: 1 }];
    buried.modal = modal(
        "Quietly Handled",
        "The negatives arrive by courier. Nothing ever runs.",
    );
    buried.effects = vec![Effect::AdjustReputation { amount: 2.0 }];
    buried.next_chapter = Some("weathered".to_string());

    let mut weathered = blank_chapter("weathered", "Storm Weathered");
    weathered.effects = vec![Effect::UnlockAchievement {
        key: "teflon_studio".to_string(),
    }];
    weathered.resolution = true;

    let mut ruined = blank_chapter("ruined", "A Name Ruined");
    ruined.modal = modal(
        "A Name Ruined",
        "Your star's morals clause is invoked by the distributors. The \
         contract is torn up.",
    );
    ruined.effects = vec![Effect::MarkActorLost];
    ruined.resolution = true;
    ruined.failure = true;

    StorylineDefinition {
        id: "scandal_in_the_papers".to_string(),
        category: Category::Business,
        name: "Scandal in the Papers".to_string(),
        description: "The gossip columns have something on your studio.".to_string(),
        trigger_conditions: vec![
            TriggerCondition::ReputationRange {
                min: Some(30.0),
                max: None,
            },
            TriggerCondition::AnyFilmQualityAtLeast { quality: 70.0 },
        ],
        chapters: vec![whispers, headline, buried, weathered, ruined],
    }
}

/// The 1934 Production Code: comply, or gamble on defiance.
pub fn the_hays_code() -> StorylineDefinition {
    let mut enforcement = blank_chapter("enforcement", "The Breen Office");
    enforcement.modal = modal(
        "The Breen Office",
        "As of this year, {YEAR}, every release needs a Production Code \
         seal. Your slate has two pictures that will never get one as shot.",
    );
    enforcement.choices = vec![
        Choice {
            text: "Reshoot and comply fully".to_string(),
            cost: 30_000,
            effects: vec![
                set_var("daring", Value::Float(0.0)),
                Effect::AdjustReputation { amount: 4.0 },
            ],
            next_chapter: Some("compliant".to_string()),
        },
        Choice {
            text: "Release through independent theaters".to_string(),
            cost: 0,
            effects: vec![set_var("daring", Value::Float(0.9))],
            next_chapter: Some("defiant".to_string()),
        },
    ];

    let mut compliant = blank_chapter("compliant", "Seal of Approval");
    compliant.trigger_conditions = vec![TriggerCondition::WeeksAfterPrevious { weeks: 4 }];
    compliant.modal = modal(
        "Seal of Approval",
        "The reshoots clear the Breen Office without a note. The majors \
         treat you as one of their own.",
    );
    compliant.resolution = true;

    let mut defiant = blank_chapter("defiant", "Outside the Code");
    defiant.trigger_conditions = vec![TriggerCondition::WeeksAfterPrevious { weeks: 6 }];
    defiant.modal = modal(
        "Outside the Code",
        "The independents book both pictures sight unseen.",
    );
    defiant.conditional_outcome = Some(ConditionalOutcome {
        condition: OutcomeCondition::Random { probability: 0.35 },
        on_success: OutcomeBranch {
            modal: modal(
                "Forbidden Fruit",
                "Word of mouth packs the houses that will show them.",
            ),
            effects: vec![
                Effect::AdjustCash { amount: 60_000 },
                Effect::AdjustReputation { amount: 3.0 },
            ],
            next_chapter: Some("code_era".to_string()),
        },
        on_failure: OutcomeBranch {
            modal: modal(
                "Blacklisted",
                "The major circuits freeze out your whole slate in reply.",
            ),
            effects: vec![
                Effect::AdjustCash { amount: -20_000 },
                Effect::AdjustReputation { amount: -8.0 },
            ],
            next_chapter: Some("censured".to_string()),
        },
    });

    let mut code_era = blank_chapter("code_era", "The Code Era Begins");
    code_era.resolution = true;

    let mut censured = blank_chapter("censured", "Censured");
    censured.resolution = true;
    censured.failure = true;

    StorylineDefinition {
        id: "the_hays_code".to_string(),
        category: Category::Historical,
        name: "The Hays Code".to_string(),
        description: "1934: the Production Code gets teeth.".to_string(),
        trigger_conditions: vec![TriggerCondition::YearExact { year: 1934 }],
        chapters: vec![enforcement, compliant, defiant, code_era, censured],
    }
}
