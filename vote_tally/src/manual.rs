/*!

This is the long-form manual for `vote_tally` and `votacao`.

## Running a vote

`votacao` keeps the tally of an assembly electing one or more positions
("cargos"). Every position has its own candidates and its own count. The
tally only lives in memory: nothing is saved when the program stops, except the
reports explicitly exported.

Commands are read line by line, from the standard input or from a file given
with `--input`:

```bash
votacao --config assembleia.json
votacao --input contagem.txt --out stdout
```

After every change, the ranking of the active position is printed again.

## Commands

Candidates are referred to by their id, which is printed next to their name.
All the candidate commands apply to the active position.

| command                     | effect                                        |
|-----------------------------|-----------------------------------------------|
| `vote <id>`                 | adds one vote                                 |
| `unvote <id>`               | removes one vote (never below zero)           |
| `add <name>`                | adds a candidate                              |
| `rename <id> <name>`        | renames a candidate                           |
| `delete <id>`               | deletes a candidate                           |
| `reset`                     | sets all the votes of the active position to 0|
| `position add <name>`       | adds a position and selects it                |
| `position rename <name>`    | renames the active position                   |
| `position select <id>`      | selects another position                      |
| `position delete <id>`      | deletes a position                            |
| `show`                      | prints the active position                    |
| `positions`                 | prints all the positions and their totals     |
| `ranking`                   | prints the results of all the positions       |
| `info`                      | prints the qualifications for the position    |
| `report [directory]`        | exports the PDF report                        |
| `help`                      | prints the list of commands                   |
| `quit`                      | stops reading commands                        |

Empty names are ignored, as well as removing a vote from a candidate without
votes. Lines starting with `#` are comments.

When the active position is deleted, the first remaining position becomes
active.

## Ranking and ties

Candidates are sorted by decreasing number of votes. Candidates with the same
number of votes keep the order in which they were added. When two or more
candidates share the same number of votes, and this number is not zero, they
are marked as tied (`Empate`).

## Reports

The `report` command writes a PDF file named `votacao-<date>.pdf`, for example
`votacao-2026-10-16.pdf`. For every position, it contains the total number of
votes and the ranking of the candidates with their share of the votes, rounded
to one decimal. A position without any vote shows `0%` for every candidate.

## Configuration

The initial positions and candidates can be provided in a JSON file with
`--config`. Without it, the tally starts with the positions `Diácono` (with
three candidates) and `Presbítero`.

```json
{
  "positions": [
    {
      "name": "Diácono",
      "candidates": [
        { "name": "João Silva" },
        { "name": "Maria Santos", "votes": 2 }
      ]
    },
    { "name": "Presbítero", "candidates": [] }
  ],
  "activePosition": "Diácono"
}
```

- `votes` (optional, default 0): votes already counted, for example when
 resuming a count done on paper.
- `activePosition` (optional): the name of the position displayed first.

## Summary output

With `--out`, a JSON summary of all the positions is written when the commands
are done (`stdout` prints it). With `--reference`, this summary is compared to a
reference file, and the differences are printed.

 */
