use crate::models::{Axis, Question, RatingBounds};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("question count must be within {min}..={max}, got {requested}")]
pub struct QuestionCountError {
    pub requested: usize,
    pub min: usize,
    pub max: usize,
}

fn prompt(axis: Axis) -> &'static str {
    match axis {
        Axis::SelfDirection => "自分で考え、自分のやり方で仕事を進めることを重視している",
        Axis::Security => "運営が安定していて、予測できる状況を重視している",
        Axis::Universalism => "多様性や公平さ、人権などを重視している",
        Axis::Stimulation => "新しい挑戦や変化を求めることを重視している",
        Axis::Power => "権力や地位、名声を得ることを重視している",
        Axis::Achievement => "成功や達成、優秀さを重視している",
        Axis::Hedonism => "快楽や楽しさ、幸福感を重視している",
    }
}

/// Fixed PVQ question bank, one prompt per axis
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    min_count: usize,
    max_count: usize,
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new(&RatingBounds::default())
    }
}

impl QuestionBank {
    pub fn new(bounds: &RatingBounds) -> Self {
        let questions: Vec<Question> = Axis::ALL
            .iter()
            .map(|&axis| Question {
                axis,
                column: axis.column(),
                text: prompt(axis),
            })
            .collect();
        let max_count = bounds.max_axes.min(questions.len());
        Self {
            min_count: bounds.min_axes.min(max_count),
            max_count,
            questions,
        }
    }

    /// Every question in canonical axis order
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    /// `count` distinct questions picked at random, in random order
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, QuestionCountError> {
        if count < self.min_count || count > self.max_count {
            return Err(QuestionCountError {
                requested: count,
                min: self.min_count,
                max: self.max_count,
            });
        }
        Ok(self
            .questions
            .choose_multiple(rng, count)
            .cloned()
            .collect())
    }
}
