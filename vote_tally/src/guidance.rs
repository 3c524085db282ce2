//! Reference texts for some well-known positions.
//!
//! Assemblies electing deacons and elders usually read the qualifications
//! for the office before the vote. They are attached to the positions by name.

/// The qualifications attached to a position.
#[derive(Eq, PartialEq, Debug)]
pub struct Guidance {
    pub position: &'static str,
    pub title: &'static str,
    pub verses: &'static str,
    pub requirements: &'static [&'static str],
}

const GUIDANCES: &[Guidance] = &[
    Guidance {
        position: "Diácono",
        title: "Características do Diácono (1 Timóteo 3:8-13)",
        verses: "\"Os diáconos igualmente devem ser dignos, homens de palavra, não amigos de muito vinho nem de lucro desonesto. Devem apegar-se ao mistério da fé com a consciência limpa.\" - 1 Timóteo 3:8-9",
        requirements: &[
            "Dignos e respeitáveis",
            "Homens de palavra (sinceros, não de duas línguas)",
            "Não inclinados a muito vinho",
            "Não cobiçosos de lucro desonesto",
            "Devem guardar o mistério da fé com consciência pura",
            "Primeiro sejam experimentados",
            "Maridos de uma só mulher",
            "Governem bem seus filhos e suas próprias casas",
        ],
    },
    Guidance {
        position: "Presbítero",
        title: "Características do Presbítero (1 Timóteo 3:1-7)",
        verses: "\"Se alguém deseja ser bispo, deseja uma nobre função. É necessário, pois, que o bispo seja irrepreensível, marido de uma só mulher, moderado, sensato, respeitável, hospitaleiro e apto para ensinar.\" - 1 Timóteo 3:1-2",
        requirements: &[
            "Irrepreensível (acima de qualquer acusação)",
            "Marido de uma só mulher",
            "Temperante (sóbrio, moderado)",
            "Sóbrio (sensato, prudente)",
            "Respeitável (comportamento adequado)",
            "Hospitaleiro",
            "Apto para ensinar",
            "Não dado ao vinho",
            "Não violento, mas cordato (gentil)",
            "Não briguento",
            "Não avarento (não apegado ao dinheiro)",
            "Governe bem sua própria casa",
            "Filhos obedientes",
            "Não seja recém-convertido",
            "Tenha boa reputação com os de fora",
        ],
    },
];

/// The reference text for a position, if there is one for this name.
pub fn guidance_for(position_name: &str) -> Option<&'static Guidance> {
    let name = position_name.trim();
    GUIDANCES.iter().find(|g| g.position == name)
}

impl Guidance {
    pub fn to_text(&self) -> String {
        let mut res = format!(
            "{}\n\n{}\n\nRequisitos e Qualificações:\n",
            self.title, self.verses
        );
        for req in self.requirements {
            res.push_str("  • ");
            res.push_str(req);
            res.push('\n');
        }
        res
    }
}
