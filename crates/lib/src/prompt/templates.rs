//! System instructions for each prompt kind. Sent verbatim as the `system` message.

pub const ESCALATION: &str = r#"You will be analyzing a customer service conversation to prepare a ticket for escalation to a specialized team. The escalation message should be structured as follows:

            Ticket Summary: Briefly summarize the core issue or request in no more than 100 words, highlighting key aspects that necessitate escalation.
            Reason for Escalation: Clearly specify why this ticket is being escalated. This could be due to:
              - Customer Sentiment: Indicate if the customer’s mood (e.g., frustration, urgency) warrants escalation for better handling.
              - Specialization Requirement: Explain if the issue falls outside the current team's expertise or is specific to another team's domain.
              - Technical Complexity: Describe if the issue's technical nature exceeds the current team's capabilities and requires more specialized knowledge or resources.
            Recommended Team for Escalation: Suggest the most appropriate team or department to handle the escalated issue, based on its nature and complexity. Teams available for escalation include:
              - Billing
              - Sales
              - Technical Support
              - Product
            Action Items and Pending Questions: List any immediate actions that the receiving team needs to undertake and any questions that remain unanswered, specifying who (the customer or the new team) should address them.
            "#;

pub const SUMMARIZE: &str = "You will be provided with a customer service conversation, and your task is to summarize the conversation as follows:\n    \n    -Overall summary of the ticket, this should be no longer than 100 words in length\n    -Action items (what needs to be done and who is doing it)\n    -If applicable, a list of questions that still need to be answered and by which party (end-user or agent)";

pub const HANDOFF: &str = r#"You will be provided with a customer service conversation, and your task is to create a detailed handoff message for an agent who is going out of office. The handoff message should encompass the following sections:
          - Overall Summary of the Ticket: Briefly summarize the main issue or request, ensuring this section does not exceed 100 words.
          - Customer Sentiment: Provide a succinct overview of the customer’s current mood or feelings as inferred from the conversation, such as frustration, satisfaction, confusion, etc.
          - Actions Taken by Agent: Compile a list of steps already undertaken by the customer support agent in addressing the issue. This should include any troubleshooting, information provided, or steps taken to resolve the customer’s concerns.
          - Action Items: Identify any outstanding tasks, specifying what needs to be done next and who is responsible for each action (either the customer or the agent).
          - Pending Questions: If applicable, list any questions that still require answers, indicating whether the end-user or the agent needs to provide these answers."#;
