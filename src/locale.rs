//! Display strings and generator directives per language.
//!
//! A [`Language`] is chosen once at startup and resolves to a static
//! [`Messages`] table that is passed by reference wherever text is rendered.

use std::fmt;

use clap::ValueEnum;

/// Languages the prompts and the generated message can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[value(name = "en")]
    English,
    #[value(name = "zh")]
    Chinese,
    #[value(name = "es")]
    Spanish,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Chinese, Language::Spanish];

    /// Native name shown in the language picker.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Chinese => "简体中文",
            Language::Spanish => "Español",
        }
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Language::English => &ENGLISH,
            Language::Chinese => &CHINESE,
            Language::Spanish => &SPANISH,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display strings and generator directives for one language.
#[derive(Debug)]
pub struct Messages {
    /// First line of the generation request: which language and style to write in.
    pub style_directive: &'static str,
    /// Output rules appended to every generation request.
    pub format_rules: &'static [&'static str],

    pub staging: &'static str,
    pub changes_summary: &'static str,
    pub nothing_to_commit: &'static str,
    pub intent_prompt: &'static str,
    pub generating: &'static str,
    pub still_generating: &'static str,
    pub generated: &'static str,
    pub generation_failed: &'static str,
    pub draft_header: &'static str,
    pub menu_title: &'static str,
    pub menu_commit: &'static str,
    pub menu_regenerate: &'static str,
    pub menu_edit: &'static str,
    pub menu_cancel: &'static str,
    pub menu_prompt: &'static str,
    pub invalid_choice: &'static str,
    pub edit_aborted: &'static str,
    pub edit_failed: &'static str,
    pub edit_prompt: &'static str,
    pub committed: &'static str,
    pub cancelled: &'static str,
    pub no_upstream: &'static str,
    pub local_ahead: &'static str,
    pub blocked_remote_ahead: &'static str,
    pub blocked_diverged: &'static str,
    pub blocked_detached: &'static str,
    pub safety_unknown: &'static str,
}

static ENGLISH: Messages = Messages {
    style_directive: "You write git commit messages in English, following the Conventional Commits style. \
Match the tone and conventions of the recent commit subjects below.",
    format_rules: &[
        "First line: `type(scope): summary` where type is one of feat, fix, docs, style, refactor, perf, test, build, ci, chore.",
        "The first line MUST be at most 50 characters, imperative mood, no trailing period.",
        "Second line: blank.",
        "Body: one line per affected file, `- <file name>: <one-line description>`, using the file name only (no directory path).",
        "Output ONLY the commit message. No markdown code fences, no quotes, no explanations.",
    ],
    staging: "Staging all changes...",
    changes_summary: "Staged changes",
    nothing_to_commit: "Nothing to commit, working tree clean.",
    intent_prompt: "Describe the intent of this change (optional, Enter to skip)",
    generating: "Generating commit message",
    still_generating: "Still generating, the model is thinking",
    generated: "Generated in",
    generation_failed: "Generation failed after",
    draft_header: "Proposed commit message:",
    menu_title: "What would you like to do?",
    menu_commit: "Commit with this message",
    menu_regenerate: "Regenerate",
    menu_edit: "Edit",
    menu_cancel: "Cancel",
    menu_prompt: "Choose [1-4]",
    invalid_choice: "Invalid choice, please enter a number from 1 to 4.",
    edit_aborted: "Edit aborted, keeping the current message.",
    edit_failed: "Could not edit the message",
    edit_prompt: "Commit message",
    committed: "Committed.",
    cancelled: "Cancelled, nothing was committed.",
    no_upstream: "Branch has no upstream; committing locally only.",
    local_ahead: "Local branch is ahead of its upstream.",
    blocked_remote_ahead: "Commit blocked: the upstream branch has new commits. Pull first.",
    blocked_diverged: "Commit blocked: local and upstream branches have diverged. Rebase or merge first.",
    blocked_detached: "Commit blocked: HEAD is detached. Check out a branch first.",
    safety_unknown: "Commit blocked: could not determine the branch state",
};

static CHINESE: Messages = Messages {
    style_directive: "你负责用简体中文撰写 git 提交信息，遵循 Conventional Commits 规范，类型标签保留英文。\
请参考下面最近的提交标题的语气和习惯。",
    format_rules: &[
        "第一行：`type(scope): 摘要`，type 取 feat、fix、docs、style、refactor、perf、test、build、ci、chore 之一。",
        "第一行最多 50 个字符，使用祈使语气，结尾不加句号。",
        "第二行：空行。",
        "正文：每个受影响的文件一行，格式为 `- <文件名>: <一句话描述>`，只写文件名，不带目录路径。",
        "只输出提交信息本身。不要使用 markdown 代码块，不要加引号，不要解释。",
    ],
    staging: "正在暂存所有更改...",
    changes_summary: "已暂存的更改",
    nothing_to_commit: "没有需要提交的内容，工作区是干净的。",
    intent_prompt: "简要描述本次修改的意图（可选，直接回车跳过）",
    generating: "正在生成提交信息",
    still_generating: "仍在生成，模型正在思考",
    generated: "生成耗时",
    generation_failed: "生成失败，耗时",
    draft_header: "建议的提交信息：",
    menu_title: "接下来要做什么？",
    menu_commit: "使用此信息提交",
    menu_regenerate: "重新生成",
    menu_edit: "编辑",
    menu_cancel: "取消",
    menu_prompt: "请选择 [1-4]",
    invalid_choice: "无效的选择，请输入 1 到 4 之间的数字。",
    edit_aborted: "编辑已放弃，保留当前信息。",
    edit_failed: "无法编辑提交信息",
    edit_prompt: "提交信息",
    committed: "已提交。",
    cancelled: "已取消，没有提交任何内容。",
    no_upstream: "当前分支没有上游分支，仅在本地提交。",
    local_ahead: "本地分支领先于上游分支。",
    blocked_remote_ahead: "已阻止提交：上游分支有新的提交，请先拉取。",
    blocked_diverged: "已阻止提交：本地分支与上游分支已分叉，请先变基或合并。",
    blocked_detached: "已阻止提交：HEAD 处于分离状态，请先检出一个分支。",
    safety_unknown: "已阻止提交：无法确定分支状态",
};

static SPANISH: Messages = Messages {
    style_directive: "Escribes mensajes de commit de git en español, siguiendo el estilo Conventional Commits \
(las etiquetas de tipo se mantienen en inglés). Imita el tono de los títulos de commits recientes.",
    format_rules: &[
        "Primera línea: `type(scope): resumen`, donde type es feat, fix, docs, style, refactor, perf, test, build, ci o chore.",
        "La primera línea DEBE tener como máximo 50 caracteres, en modo imperativo y sin punto final.",
        "Segunda línea: en blanco.",
        "Cuerpo: una línea por archivo afectado, `- <nombre de archivo>: <descripción de una línea>`, solo el nombre del archivo (sin ruta).",
        "Devuelve SOLO el mensaje de commit. Sin bloques de código markdown, sin comillas, sin explicaciones.",
    ],
    staging: "Preparando todos los cambios...",
    changes_summary: "Cambios preparados",
    nothing_to_commit: "Nada que confirmar, el árbol de trabajo está limpio.",
    intent_prompt: "Describe la intención del cambio (opcional, Enter para omitir)",
    generating: "Generando el mensaje de commit",
    still_generating: "Todavía generando, el modelo está pensando",
    generated: "Generado en",
    generation_failed: "La generación falló tras",
    draft_header: "Mensaje de commit propuesto:",
    menu_title: "¿Qué quieres hacer?",
    menu_commit: "Confirmar con este mensaje",
    menu_regenerate: "Regenerar",
    menu_edit: "Editar",
    menu_cancel: "Cancelar",
    menu_prompt: "Elige [1-4]",
    invalid_choice: "Opción no válida, introduce un número del 1 al 4.",
    edit_aborted: "Edición cancelada, se mantiene el mensaje actual.",
    edit_failed: "No se pudo editar el mensaje",
    edit_prompt: "Mensaje de commit",
    committed: "Commit creado.",
    cancelled: "Cancelado, no se creó ningún commit.",
    no_upstream: "La rama no tiene upstream; el commit será solo local.",
    local_ahead: "La rama local va por delante de su upstream.",
    blocked_remote_ahead: "Commit bloqueado: la rama upstream tiene commits nuevos. Haz pull primero.",
    blocked_diverged: "Commit bloqueado: las ramas local y upstream han divergido. Haz rebase o merge primero.",
    blocked_detached: "Commit bloqueado: HEAD está desacoplado. Cambia a una rama primero.",
    safety_unknown: "Commit bloqueado: no se pudo determinar el estado de la rama",
};
