//! Seed data: built-in taxonomy, question banks and quiz items.
//!
//! These guarantee the app is useful even without external config. A TOML
//! config (AGENT_CONFIG_PATH) can replace any of them wholesale.

use crate::domain::{PromptQuestion, QuizQuestion};
use crate::taxonomy::{Subcategory, Taxonomy, TaxonomyCategory};

macro_rules! subs {
  ($(($name:expr, $desc:expr)),+ $(,)?) => {
    vec![$(Subcategory { name: $name.into(), description: Some($desc.into()) }),+]
  };
}

/// The fixed two-level mistake taxonomy. The trailing `Other > Uncategorized`
/// cell is the fallback bucket for labels that match nothing.
pub fn seed_taxonomy() -> Taxonomy {
  Taxonomy::new(vec![
    TaxonomyCategory {
      category: "Grammar".into(),
      subcategories: subs![
        ("Subject-Verb Agreement", "verb form must match the subject in number and person"),
        ("Tense Consistency", "keeping a consistent and correct verb tense"),
        ("Articles", "use of a/an/the"),
        ("Prepositions", "correct preposition choice and placement"),
        ("Punctuation", "commas, periods and other punctuation"),
        ("Sentence Fragments", "incomplete sentences missing a subject or verb"),
        ("Run-on Sentences", "independent clauses joined without punctuation"),
      ],
    },
    TaxonomyCategory {
      category: "Vocabulary".into(),
      subcategories: subs![
        ("Word Choice", "wrong or imprecise word for the context"),
        ("Collocations", "unnatural word combinations"),
        ("Register", "informal wording in an academic context"),
        ("Spelling", "misspelled words"),
        ("Repetition", "overuse of the same word or phrase"),
      ],
    },
    TaxonomyCategory {
      category: "Structure".into(),
      subcategories: subs![
        ("Paragraph Organization", "logical paragraphing and topic sentences"),
        ("Coherence", "ideas follow logically from one another"),
        ("Cohesion", "sentences connect smoothly"),
        ("Linking Words", "use of connectives and transitions"),
      ],
    },
    TaxonomyCategory {
      category: "Task Achievement".into(),
      subcategories: subs![
        ("Addressing All Parts", "covering every part of the question"),
        ("Answer Relevance", "staying on topic"),
        ("Task Response", "developing a clear position with support"),
      ],
    },
    TaxonomyCategory {
      category: "Tone & Register".into(),
      subcategories: subs![
        ("Formality", "appropriately formal academic tone"),
        ("Appropriateness", "suitable style for the task"),
      ],
    },
    TaxonomyCategory {
      category: "Other".into(),
      subcategories: vec![Subcategory {
        name: "Uncategorized".into(),
        description: Some("anything that fits no other cell".into()),
      }],
    },
  ])
}

/// Built-in Task 2 style writing prompts.
pub fn seed_writing_questions() -> Vec<PromptQuestion> {
  let q = |id: &str, question: &str| PromptQuestion { id: id.into(), question: question.into() };
  vec![
    q("w1", "Some people believe that university education should be free for all students. To what extent do you agree or disagree?"),
    q("w2", "In many countries, the proportion of older people is steadily increasing. Does this trend have more positive or negative effects on society?"),
    q("w3", "Some argue that governments should invest more in public transport than in new roads. Discuss both views and give your own opinion."),
    q("w4", "Nowadays many people choose to work from home. What are the advantages and disadvantages of this development?"),
    q("w5", "Advertising aimed at children should be banned. To what extent do you agree or disagree?"),
    q("w6", "Some people think international tourism harms local cultures. Do you agree or disagree?"),
  ]
}

/// Built-in speaking prompts (part 2 style cue cards).
pub fn seed_speaking_questions() -> Vec<PromptQuestion> {
  let q = |id: &str, question: &str| PromptQuestion { id: id.into(), question: question.into() };
  vec![
    q("s1", "Describe a skill you would like to learn. You should say what it is, why you want to learn it, and how you would learn it."),
    q("s2", "Describe a memorable journey you have taken. You should say where you went, who you were with, and why it was memorable."),
    q("s3", "Describe a person who has influenced you. You should say who they are, how you know them, and how they influenced you."),
    q("s4", "Describe a book or film that made a strong impression on you and explain why."),
    q("s5", "Describe a time when you had to solve a difficult problem. You should say what the problem was and how you solved it."),
    q("s6", "Describe a place in your city you would recommend to visitors and explain why."),
  ]
}

macro_rules! quiz {
  ($id:expr, $cat:expr, $sub:expr, $q:expr, [$($opt:expr),+ $(,)?], $correct:expr) => {
    QuizQuestion {
      id: $id.into(),
      question: $q.into(),
      options: vec![$($opt.into()),+],
      correct_index: $correct,
      category: $cat.into(),
      subcategory: $sub.into(),
    }
  };
}

/// Built-in practice quiz bank. Each item tests one taxonomy cell so the
/// recommender can match top mistake labels to practice material.
pub fn seed_quiz_bank() -> Vec<QuizQuestion> {
  vec![
    quiz!("1", "Grammar", "Subject-Verb Agreement",
      "Which sentence is correct?",
      ["She go to school every day.", "She goes to school every day.",
       "She going to school every day.", "She gone to school every day."], 1),
    quiz!("2", "Grammar", "Subject-Verb Agreement",
      "Identify the error: 'The list of items are on the desk.'",
      ["'are' should be 'is'", "'list' should be 'lists'", "'desk' should be 'desks'", "No error"], 0),
    quiz!("3", "Grammar", "Tense Consistency",
      "Choose the sentence with correct tense consistency:",
      ["Yesterday, I go to the market and buy some fruits.",
       "Yesterday, I went to the market and buy some fruits.",
       "Yesterday, I went to the market and bought some fruits.",
       "Yesterday, I go to the market and bought some fruits."], 2),
    quiz!("4", "Grammar", "Articles",
      "Which sentence uses articles correctly?",
      ["She is a honest person.", "She is an honest person.",
       "She is honest person.", "She is the honest person."], 1),
    quiz!("5", "Grammar", "Prepositions",
      "Identify the preposition error: 'He is good in English.'",
      ["'in' should be 'at'", "'good' should be 'well'",
       "'English' should be 'the English'", "No error"], 0),
    quiz!("6", "Grammar", "Punctuation",
      "Which sentence uses punctuation correctly?",
      ["She likes apples oranges and bananas.", "She likes apples, oranges, and bananas.",
       "She likes, apples, oranges and bananas.", "She likes apples oranges, and bananas."], 1),
    quiz!("7", "Grammar", "Sentence Fragments",
      "Which of these is a sentence fragment?",
      ["Because the bus was late.", "The bus was late.",
       "The bus was late, so I walked.", "I waited for the bus."], 0),
    quiz!("8", "Grammar", "Run-on Sentences",
      "Which option fixes this run-on: 'The exam was hard I still passed.'?",
      ["The exam was hard, I still passed.", "The exam was hard I still, passed.",
       "The exam was hard, but I still passed.", "The exam was hard but, I still passed."], 2),
    quiz!("9", "Vocabulary", "Word Choice",
      "Choose the most precise word: 'The government should ___ the new policy.'",
      ["do", "implement", "make", "put"], 1),
    quiz!("10", "Vocabulary", "Collocations",
      "Which collocation is natural English?",
      ["make a research", "do a mistake", "take a decision quickly", "pay attention"], 3),
    quiz!("11", "Vocabulary", "Register",
      "Which phrase suits an academic essay?",
      ["a bunch of reasons", "loads of reasons", "several reasons", "tons of reasons"], 2),
    quiz!("12", "Vocabulary", "Spelling",
      "Which word is spelled correctly?",
      ["goverment", "government", "govermant", "governmet"], 1),
    quiz!("13", "Vocabulary", "Repetition",
      "What is the best way to avoid repeating 'important' throughout an essay?",
      ["Use it anyway", "Replace some uses with synonyms like 'significant' or 'crucial'",
       "Delete every sentence containing it", "Write it in capital letters"], 1),
    quiz!("14", "Structure", "Paragraph Organization",
      "A body paragraph should usually begin with:",
      ["a quotation", "a topic sentence", "a statistic", "a rhetorical question"], 1),
    quiz!("15", "Structure", "Coherence",
      "Coherence in writing mainly means:",
      ["using long sentences", "ideas follow logically from one another",
       "using advanced vocabulary", "writing more than 250 words"], 1),
    quiz!("16", "Structure", "Cohesion",
      "Which device most improves cohesion between sentences?",
      ["random topic shifts", "referencing words like 'this' and 'these'",
       "starting every sentence with 'And'", "omitting pronouns"], 1),
    quiz!("17", "Structure", "Linking Words",
      "Choose the best linker: 'Cars are convenient; ___, they cause pollution.'",
      ["moreover", "however", "therefore", "similarly"], 1),
    quiz!("18", "Task Achievement", "Addressing All Parts",
      "The question asks you to 'discuss both views and give your opinion'. You must:",
      ["discuss one view only", "give only your opinion",
       "cover both views and state your opinion", "summarize the question"], 2),
    quiz!("19", "Task Achievement", "Answer Relevance",
      "If the topic is public transport, which idea is off-topic?",
      ["bus ticket prices", "metro coverage", "your favourite holiday destination", "commuting times"], 2),
    quiz!("20", "Task Achievement", "Task Response",
      "A strong Task 2 response requires:",
      ["a clear position supported throughout", "as many ideas as possible without development",
       "memorized essays", "only personal anecdotes"], 0),
    quiz!("21", "Tone & Register", "Formality",
      "Which sentence is appropriately formal?",
      ["Kids these days are glued to their phones.",
       "Young people increasingly rely on mobile devices.",
       "Everyone's hooked on their phone, right?",
       "Phones are such a pain."], 1),
    quiz!("22", "Tone & Register", "Appropriateness",
      "In an IELTS essay, contractions like \"don't\" are:",
      ["required", "best avoided", "mandatory in conclusions", "only allowed in introductions"], 1),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn quiz_bank_is_well_formed() {
    let bank = seed_quiz_bank();
    let mut ids = HashSet::new();
    for q in &bank {
      assert!(ids.insert(q.id.clone()), "duplicate quiz id {}", q.id);
      assert!(q.correct_index < q.options.len(), "bad correct_index in {}", q.id);
      assert!(q.options.len() >= 2);
    }
  }

  #[test]
  fn every_quiz_item_targets_a_taxonomy_cell() {
    let tax = seed_taxonomy();
    for q in seed_quiz_bank() {
      assert!(
        tax.has_cell(&q.category, &q.subcategory),
        "quiz {} references unknown cell {} > {}",
        q.id, q.category, q.subcategory
      );
    }
  }

  #[test]
  fn taxonomy_has_the_fallback_cell() {
    let tax = seed_taxonomy();
    assert!(tax.has_cell("Other", "Uncategorized"));
  }

  #[test]
  fn question_bank_ids_are_unique_per_mode() {
    for bank in [seed_writing_questions(), seed_speaking_questions()] {
      let mut ids = HashSet::new();
      for q in &bank {
        assert!(ids.insert(q.id.clone()));
        assert!(!q.question.trim().is_empty());
      }
    }
  }
}
