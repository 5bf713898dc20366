//! Prompt construction for AI-generated commit messages.

/// Build the LLM prompt for generating a commit message.
///
/// The diff is embedded verbatim, even when empty. The `(Breaking)` prefix
/// is requested from the model but never checked afterwards.
pub fn build_commit_prompt(diff: &str) -> String {
    format!(
        r#"Below is a diff of all staged changes, coming from the command:

```
{diff}
```

Please generate a concise, one-line commit message for these changes.

Your only output should be a single line containing the commit message.
Do not include any other information.
Do not format the line in any way other than plain text.

If the changes contain breaking changes, please start the commit message with "(Breaking)".

Examples:
- User display name now defaults to "Anonymous" if not provided
- Fixed bug where user could not log in with email address
- (Breaking) Removed support for Python 2.7
"#
    )
}
