use std::fmt;

/// CSSセレクタと、その何番目の一致を使うか
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    selector: String,
    index: usize,
}

impl Step {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// 要素へのパス。各ステップは直前の一致要素の中で検索する
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    steps: Vec<Step>,
}

impl Locator {
    /// ドキュメント内で `selector` に最初に一致する要素
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            steps: vec![Step {
                selector: selector.into(),
                index: 0,
            }],
        }
    }

    /// 最後のステップで `index` 番目の一致を使う
    pub fn nth(mut self, index: usize) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.index = index;
        }
        self
    }

    /// 現在の要素内で `selector` に最初に一致する要素
    pub fn child(mut self, selector: impl Into<String>) -> Self {
        self.steps.push(Step {
            selector: selector.into(),
            index: 0,
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// 最後のステップを除いたステップ
    pub fn parent_steps(&self) -> &[Step] {
        &self.steps[..self.steps.len().saturating_sub(1)]
    }

    pub fn last_step(&self) -> &Step {
        // コンストラクタは必ず1ステップ以上を持つ
        &self.steps[self.steps.len() - 1]
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            write!(f, "{}[{}]", step.selector, step.index)?;
        }
        Ok(())
    }
}
