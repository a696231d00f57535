//! Prompt assembly for the review LLM call.
//!
//! The output-format rules in the system prompt are a contract with
//! [`super::review_parser`]: heading markers and section order here must
//! stay in sync with what the parser extracts.

/// Build the system prompt, embedding the rendered knowledge block.
pub fn build_system_prompt(knowledge_prompt: &str) -> String {
    format!(
        r#"あなたはコードレビュアーです。
以下のルールと過去の判断基準に基づいてレビューしてください。

## ユーザーのコーディング哲学・ルール
{knowledge_prompt}

## レビュー指示
1. 上記のルールに違反している箇所を指摘
2. 改善案を具体的に提示
3. なぜそのルールが重要か説明
4. 良い点も必ず指摘する

**重要**: ユーザーの哲学・ルールを最優先してください。

## 出力フォーマット（この形式を厳密に守ること）

**必ず以下の構造で出力してください:**

### 良い点
- 良い点1
- 良い点2

### 1. 改善点のタイトル

- 問題点の説明
- 理由の説明

改善例：
```python
# 改善後のコード
```

### 2. 改善点のタイトル

- 問題点の説明
- 理由の説明

改善例：
```python
# 改善後のコード
```

### 総合評価
総合的な評価を1-2文で記述

**絶対に守るべきルール:**
1. 各セクションは必ず「### 」で始める（###の後にスペース）
2. 改善点は「### 数字. タイトル」の形式
3. コードブロックは```言語名で囲む
4. この順序を必ず守る: 良い点 → 改善点 → 総合評価"#
    )
}

/// Build the user prompt carrying the code under review.
pub fn build_user_prompt(code: &str, language: &str, context: Option<&str>) -> String {
    let mut prompt = format!("## レビュー対象コード\n言語: {language}\n\n");
    if let Some(ctx) = context {
        if !ctx.is_empty() {
            prompt.push_str(&format!("コンテキスト: {ctx}\n\n"));
        }
    }
    prompt.push_str(&format!("```{language}\n{code}\n```"));
    prompt
}
