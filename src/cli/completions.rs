use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rsbuild completions bash > ~/.bash_completion.d/rsbuild\n\n\
                  Generate zsh completions:\n    rsbuild completions zsh > ~/.zfunc/_rsbuild\n\n\
                  Generate fish completions:\n    rsbuild completions fish > ~/.config/fish/completions/rsbuild.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
